use alloc::sync::Arc;

use crate::{any::Instance, class::Class, errors::InstantiateErrorKind, value::Value};

/// Produces a bare object of a class without running its constructor.
///
/// Receives the class metadata and the raw explicit arguments.
/// The returned instance must be of the class type, otherwise the resolution fails with
/// [`crate::ResolveErrorKind::IncorrectType`].
pub type Allocator = Arc<dyn Fn(&Class, &[Value]) -> Result<Instance, InstantiateErrorKind> + Send + Sync>;

#[inline]
pub(crate) fn allocate(allocator: Option<&Allocator>, class: &Class, arguments: &[Value]) -> Result<Instance, InstantiateErrorKind> {
    match allocator {
        Some(allocator) => allocator(class, arguments),
        None => Ok(class.allocate()),
    }
}
