use alloc::boxed::Box;

use super::dependency_resolver::ResolveErrorKind;

/// Errors raised by user code: constructors, methods, callables, hooks, callbacks and allocators
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument at position {position} is missing")]
    MissingArgument { position: usize },
    #[error("Argument at position {position} has incorrect type. Actual: {actual}, expected: {expected}")]
    IncorrectArgument {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Receiver has incorrect type. Actual: {actual}, expected: {expected}")]
    IncorrectReceiver { expected: &'static str, actual: &'static str },
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
