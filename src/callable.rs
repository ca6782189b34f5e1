use alloc::{sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    errors::InstantiateErrorKind,
    parameter::Parameter,
    value::{Arguments, Value},
};

type CallableFn = Arc<dyn Fn(Arguments) -> Result<Value, InstantiateErrorKind> + Send + Sync>;

/// A function with statically declared parameters, used for factory definitions and [`crate::Container::invoke_function`]
#[derive(Clone)]
pub struct Callable {
    parameters: Arc<[Parameter]>,
    call: CallableFn,
}

impl Callable {
    #[inline]
    #[must_use]
    pub fn new<F>(parameters: impl IntoIterator<Item = Parameter>, call: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            parameters: parameters.into_iter().collect::<Vec<_>>().into(),
            call: Arc::new(call),
        }
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Calls the function with an already computed argument vector
    ///
    /// # Errors
    /// Returns the error of the function itself
    #[inline]
    pub fn call(&self, arguments: Arguments) -> Result<Value, InstantiateErrorKind> {
        (self.call)(arguments)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("parameters", &self.parameters).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Callable;
    use crate::{
        parameter::Parameter,
        value::{Arguments, Value},
    };

    use alloc::vec;

    #[test]
    fn test_call() {
        let sum = Callable::new([Parameter::scalar("a"), Parameter::scalar("b")], |args| {
            Ok(Value::Int(args.int(0)? + args.int(1)?))
        });

        assert_eq!(sum.parameters().len(), 2);
        assert_eq!(sum.call(Arguments::new(vec![Value::Int(1), Value::Int(2)])).unwrap(), Value::Int(3));
        assert!(sum.call(Arguments::default()).is_err());
    }
}
