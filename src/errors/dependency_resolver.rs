use alloc::string::String;

use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Class {name} not found in container")]
    NoClass { name: String },
    #[error("Method {class}::{method}() not found")]
    NoMethod { class: String, method: String },
    #[error("Function {name} not found in container")]
    NoFunction { name: String },
    #[error("Circular dependency detected for {name}. Only a singleton can reference itself while it's under construction")]
    CircularDependency { name: String },
    #[error("Can't resolve parameter {parameter}: no explicit argument, injectable type or default value")]
    UnresolvableParameter { parameter: &'static str },
    #[error("Incorrect type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: &'static str },
    #[error(transparent)]
    Instantiate(InstantiateErrorKind),
}

impl ResolveErrorKind {
    /// Returns `true` for unknown classes, methods and functions
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoClass { .. } | Self::NoMethod { .. } | Self::NoFunction { .. })
    }
}

impl From<InstantiateErrorKind> for ResolveErrorKind {
    /// Resolve errors carried out of user code are unwrapped, so the root cause surfaces unchanged
    fn from(err: InstantiateErrorKind) -> Self {
        match err {
            InstantiateErrorKind::Resolve(err) => *err,
            err => Self::Instantiate(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InstantiateErrorKind, ResolveErrorKind};

    use alloc::{boxed::Box, string::ToString as _};

    #[test]
    fn test_nested_resolve_error_unwrapped() {
        let nested = InstantiateErrorKind::Resolve(Box::new(ResolveErrorKind::NoClass { name: "Missing".to_string() }));

        let err = ResolveErrorKind::from(nested);
        assert!(matches!(&err, ResolveErrorKind::NoClass { name } if name == "Missing"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_instantiate_error_wrapped() {
        let err = ResolveErrorKind::from(InstantiateErrorKind::MissingArgument { position: 1 });

        assert!(matches!(err, ResolveErrorKind::Instantiate(InstantiateErrorKind::MissingArgument { position: 1 })));
        assert!(!err.is_not_found());
    }
}
