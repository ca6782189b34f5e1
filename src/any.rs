use alloc::sync::Arc;
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};

use crate::{class::Injectable, parameter::ClassRef};

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

pub(crate) type RcAny = Arc<dyn Any + Send + Sync>;

/// Shared handle to an object owned by the container or handed to it.
///
/// Clones point to the same object, use [`Instance::ptr_eq`] to check reference equality.
#[derive(Clone)]
pub struct Instance {
    type_info: TypeInfo,
    value: RcAny,
    class_ref: Option<ClassRef>,
}

impl Instance {
    /// Wraps any object. The handle doesn't know the class of the object,
    /// so methods can be invoked on it only if its type is registered in the container.
    /// Use [`Instance::injectable`] for injectable types.
    #[inline]
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            value,
            class_ref: None,
        }
    }

    /// Wraps an object of an injectable type together with its class
    #[inline]
    #[must_use]
    pub fn injectable<T: Injectable>(value: T) -> Self {
        Self::injectable_arc(Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub fn injectable_arc<T: Injectable>(value: Arc<T>) -> Self {
        Self {
            class_ref: Some(ClassRef::of::<T>()),
            ..Self::from_arc(value)
        }
    }

    /// Class of the object, known if the handle was built from an injectable type
    #[inline]
    #[must_use]
    pub const fn class_ref(&self) -> Option<&ClassRef> {
        self.class_ref.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    #[inline]
    #[must_use]
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast().ok()
    }

    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Returns `true` if both handles point to the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        core::ptr::eq(Arc::as_ptr(&self.value).cast::<()>(), Arc::as_ptr(&other.value).cast::<()>())
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_info.name)
            .field("ptr", &Arc::as_ptr(&self.value).cast::<()>())
            .finish()
    }
}

impl<T: Send + Sync + 'static> From<Arc<T>> for Instance {
    #[inline]
    fn from(value: Arc<T>) -> Self {
        Self::from_arc(value)
    }
}
