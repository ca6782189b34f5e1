use core::fmt::{self, Debug, Formatter};

use crate::{
    any::TypeInfo,
    class::{Class, Injectable},
    value::Value,
};

/// Reference to an injectable class used as a declared parameter type
#[derive(Clone, Copy)]
pub struct ClassRef {
    pub name: &'static str,
    pub type_info: TypeInfo,
    pub(crate) describe: fn() -> Class,
}

impl ClassRef {
    #[inline]
    #[must_use]
    pub fn of<T: Injectable>() -> Self {
        Self {
            name: T::NAME,
            type_info: TypeInfo::of::<T>(),
            describe: Class::of::<T>,
        }
    }

    #[inline]
    #[must_use]
    pub fn describe(&self) -> Class {
        (self.describe)()
    }
}

impl Debug for ClassRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("name", &self.name)
            .field("type", &self.type_info.name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum ParameterKind {
    /// Primitive or untyped parameter, satisfied by the next explicit argument or its default
    Scalar,
    /// Parameter of an injectable class, satisfied by a matching explicit argument or the class singleton
    Class(ClassRef),
}

/// Statically declared descriptor of a constructor, method or callable parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub default: Option<Value>,
}

impl Parameter {
    #[inline]
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Scalar,
            default: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn class<T: Injectable>(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Class(ClassRef::of::<T>()),
            default: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[inline]
    #[must_use]
    pub const fn class_ref(&self) -> Option<&ClassRef> {
        match &self.kind {
            ParameterKind::Class(class_ref) => Some(class_ref),
            ParameterKind::Scalar => None,
        }
    }
}
