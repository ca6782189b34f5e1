use alloc::{
    string::{String, ToString as _},
    sync::Arc,
};

use crate::{any::Instance, callable::Callable, class::Injectable};

/// Owner of a method passed to [`crate::Container::invoke_method`]
#[derive(Debug, Clone)]
pub enum MethodTarget {
    /// Class name or alias, instance methods are called on the singleton of the name
    Class(String),
    /// The class is taken from the instance if it was built from an injectable type,
    /// otherwise it's looked up by the instance type among registered classes
    Instance(Instance),
}

impl From<&str> for MethodTarget {
    #[inline]
    fn from(name: &str) -> Self {
        Self::Class(name.to_string())
    }
}

impl From<String> for MethodTarget {
    #[inline]
    fn from(name: String) -> Self {
        Self::Class(name)
    }
}

impl From<Instance> for MethodTarget {
    #[inline]
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl<T: Injectable> From<Arc<T>> for MethodTarget {
    #[inline]
    fn from(instance: Arc<T>) -> Self {
        Self::Instance(Instance::injectable_arc(instance))
    }
}

/// Function passed to [`crate::Container::invoke_function`]
#[derive(Debug, Clone)]
pub enum FunctionTarget {
    /// Name or alias of a factory definition
    Name(String),
    Callable(Callable),
}

impl From<&str> for FunctionTarget {
    #[inline]
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FunctionTarget {
    #[inline]
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Callable> for FunctionTarget {
    #[inline]
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}
