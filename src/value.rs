use alloc::{
    string::{String, ToString as _},
    sync::Arc,
    vec::Vec,
};
use core::slice;

use crate::{any::Instance, errors::InstantiateErrorKind};

/// An explicit argument, a default value or a value returned by an invocation
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(Instance),
}

impl Value {
    #[inline]
    #[must_use]
    pub fn object<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Object(Instance::new(value))
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Object(instance) => instance.type_info().name,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Converts the value to an instance, scalars are wrapped into an instance of their Rust type
    #[must_use]
    pub fn into_instance(self) -> Instance {
        match self {
            Self::Null => Instance::new(()),
            Self::Bool(val) => Instance::new(val),
            Self::Int(val) => Instance::new(val),
            Self::Float(val) => Instance::new(val),
            Self::Str(val) => Instance::new(val),
            Self::Object(instance) => instance,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<()> for Value {
    #[inline]
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(val: bool) -> Self {
        Self::Bool(val)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(val: i32) -> Self {
        Self::Int(val.into())
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(val: i64) -> Self {
        Self::Int(val)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(val: f64) -> Self {
        Self::Float(val)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(val: &str) -> Self {
        Self::Str(val.to_string())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(val: String) -> Self {
        Self::Str(val)
    }
}

impl From<Instance> for Value {
    #[inline]
    fn from(instance: Instance) -> Self {
        Self::Object(instance)
    }
}

impl<T: Send + Sync + 'static> From<Arc<T>> for Value {
    #[inline]
    fn from(val: Arc<T>) -> Self {
        Self::Object(Instance::from_arc(val))
    }
}

/// Argument vector computed by the container for a parameter list, in declared order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.values.iter()
    }

    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if there is no argument at the position
    pub fn value(&self, position: usize) -> Result<&Value, InstantiateErrorKind> {
        self.values.get(position).ok_or(InstantiateErrorKind::MissingArgument { position })
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn int(&self, position: usize) -> Result<i64, InstantiateErrorKind> {
        match self.value(position)? {
            Value::Int(val) => Ok(*val),
            other => Err(incorrect(position, "int", other)),
        }
    }

    #[allow(clippy::missing_errors_doc, clippy::cast_precision_loss)]
    pub fn float(&self, position: usize) -> Result<f64, InstantiateErrorKind> {
        match self.value(position)? {
            Value::Float(val) => Ok(*val),
            Value::Int(val) => Ok(*val as f64),
            other => Err(incorrect(position, "float", other)),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn boolean(&self, position: usize) -> Result<bool, InstantiateErrorKind> {
        match self.value(position)? {
            Value::Bool(val) => Ok(*val),
            other => Err(incorrect(position, "bool", other)),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn str(&self, position: usize) -> Result<&str, InstantiateErrorKind> {
        match self.value(position)? {
            Value::Str(val) => Ok(val.as_str()),
            other => Err(incorrect(position, "string", other)),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn instance(&self, position: usize) -> Result<&Instance, InstantiateErrorKind> {
        match self.value(position)? {
            Value::Object(instance) => Ok(instance),
            other => Err(incorrect(position, "object", other)),
        }
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if there is no argument at the position
    /// - Returns [`InstantiateErrorKind::IncorrectArgument`] if the argument isn't an object of type `T`
    pub fn object<T: Send + Sync + 'static>(&self, position: usize) -> Result<Arc<T>, InstantiateErrorKind> {
        let value = self.value(position)?;
        value
            .as_instance()
            .and_then(Instance::downcast::<T>)
            .ok_or_else(|| incorrect(position, core::any::type_name::<T>(), value))
    }
}

impl From<Vec<Value>> for Arguments {
    #[inline]
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl IntoIterator for Arguments {
    type Item = Value;
    type IntoIter = alloc::vec::IntoIter<Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[inline]
fn incorrect(position: usize, expected: &'static str, actual: &Value) -> InstantiateErrorKind {
    InstantiateErrorKind::IncorrectArgument {
        position,
        expected,
        actual: actual.type_name(),
    }
}
