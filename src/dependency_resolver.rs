use alloc::vec::Vec;
use tracing::{debug, error};

use crate::{
    errors::ResolveErrorKind,
    parameter::{Parameter, ParameterKind},
    value::{Arguments, Value},
    Container,
};

/// Builds the argument vector for a parameter list.
///
/// Explicit arguments are consumed left to right:
/// - a class parameter takes the next explicit argument only if it's an instance of the class,
///   otherwise the class singleton is resolved and the argument stays for the next parameters;
/// - a scalar parameter takes the next explicit argument, then falls back to its default.
///
/// Unconsumed trailing arguments are ignored.
///
/// # Errors
/// - Returns [`ResolveErrorKind::UnresolvableParameter`] if a scalar parameter has neither an argument nor a default
/// - Returns any error of the class singleton resolution unchanged
pub(crate) fn build_arguments(container: &Container, parameters: &[Parameter], explicit: &[Value]) -> Result<Arguments, ResolveErrorKind> {
    let mut cursor = explicit.iter().peekable();
    let mut arguments = Vec::with_capacity(parameters.len());

    for parameter in parameters {
        match &parameter.kind {
            ParameterKind::Class(class_ref) => {
                let explicit = cursor.next_if(|value| {
                    value
                        .as_instance()
                        .is_some_and(|instance| instance.type_info() == class_ref.type_info)
                });
                if let Some(value) = explicit {
                    debug!(parameter = parameter.name, "Explicit instance used");
                    arguments.push(value.clone());
                } else {
                    container.ensure_class(class_ref);
                    let instance = container.get_or_create_singleton(class_ref.name, &[])?;
                    arguments.push(Value::Object(instance));
                }
            }
            ParameterKind::Scalar => {
                if let Some(value) = cursor.next() {
                    arguments.push(value.clone());
                } else if let Some(default) = &parameter.default {
                    debug!(parameter = parameter.name, "Default value used");
                    arguments.push(default.clone());
                } else {
                    let err = ResolveErrorKind::UnresolvableParameter { parameter: parameter.name };
                    error!("{}", err);
                    return Err(err);
                }
            }
        }
    }

    Ok(Arguments::new(arguments))
}
