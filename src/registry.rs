use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
};
use tracing::{debug, error};

use crate::{any::Instance, errors::ResolveErrorKind};

/// Marker of a name whose construction is in progress
#[derive(Debug, Clone)]
pub(crate) enum Early {
    Building(Instance),
    BuildingSingleton(Instance),
    /// A factory is running, there is no instance to hand out yet.
    /// A running factory doesn't count as an instance of the name for [`InstanceRegistry::has`].
    BuildingFactory,
}

impl Early {
    #[inline]
    #[must_use]
    pub(crate) fn new(instance: Instance, singleton: bool) -> Self {
        if singleton {
            Self::BuildingSingleton(instance)
        } else {
            Self::Building(instance)
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn instance(&self) -> Option<&Instance> {
        match self {
            Self::Building(instance) | Self::BuildingSingleton(instance) => Some(instance),
            Self::BuildingFactory => None,
        }
    }
}

/// Singleton store and early construction markers, keyed by resolved name
#[derive(Debug, Default)]
pub(crate) struct InstanceRegistry {
    singletons: BTreeMap<String, Instance>,
    early: BTreeMap<String, Early>,
}

impl InstanceRegistry {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub(crate) fn has(&self, name: &str) -> bool {
        self.singletons.contains_key(name) || self.early_instance(name).is_some()
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_singleton(&self, name: &str) -> bool {
        self.singletons.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub(crate) fn singleton(&self, name: &str) -> Option<Instance> {
        self.singletons.get(name).cloned()
    }

    #[inline]
    pub(crate) fn insert_singleton(&mut self, name: &str, instance: Instance) -> Option<Instance> {
        self.singletons.insert(name.to_string(), instance)
    }

    #[inline]
    #[must_use]
    pub(crate) fn early_instance(&self, name: &str) -> Option<&Instance> {
        self.early.get(name).and_then(Early::instance)
    }

    /// Checks a name that is about to be constructed against its early marker.
    ///
    /// Returns the partially constructed instance if the name is being built as a singleton
    /// and self reference is allowed, `None` if there is no construction in progress.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::CircularDependency`] for any other re-entrant construction
    pub(crate) fn reenter(&self, name: &str, allow_self_reference: bool) -> Result<Option<Instance>, ResolveErrorKind> {
        match self.early.get(name) {
            None => Ok(None),
            Some(Early::BuildingSingleton(instance)) if allow_self_reference => {
                debug!("Early instance reused");
                Ok(Some(instance.clone()))
            }
            Some(_) => {
                let err = ResolveErrorKind::CircularDependency { name: name.to_string() };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Registers an early marker for the name.
    ///
    /// If a singleton construction of the name is already in progress, its instance is returned
    /// and no new marker is registered.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::CircularDependency`] if a non-singleton construction is already in progress
    pub(crate) fn begin_early(&mut self, name: &str, early: Early, allow_self_reference: bool) -> Result<Option<Instance>, ResolveErrorKind> {
        if let Some(instance) = self.reenter(name, allow_self_reference)? {
            return Ok(Some(instance));
        }
        self.early.insert(name.to_string(), early);
        Ok(None)
    }

    /// Moves the instance to the singleton store if it was a singleton construction, and clears the early marker
    pub(crate) fn commit(&mut self, name: &str, instance: Instance, singleton: bool) {
        if singleton {
            self.singletons.insert(name.to_string(), instance);
        }
        self.early.remove(name);
    }

    /// Removes any partial singleton entry if it was a singleton construction, and clears the early marker
    pub(crate) fn rollback(&mut self, name: &str, singleton: bool) {
        if singleton {
            self.singletons.remove(name);
        }
        self.early.remove(name);
    }
}
