use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
    sync::Arc,
};

use crate::{any::Instance, callable::Callable, class::Injectable, errors::DefinitionErrorKind};

/// What a name is bound to
#[derive(Debug, Clone)]
pub enum Definition {
    /// Another name, resolved further on lookup
    Alias(String),
    /// A function producing the instance
    Factory(Callable),
    /// A ready instance, stored as the singleton of the name
    Instance(Instance),
}

impl From<&str> for Definition {
    #[inline]
    fn from(name: &str) -> Self {
        Self::Alias(name.to_string())
    }
}

impl From<String> for Definition {
    #[inline]
    fn from(name: String) -> Self {
        Self::Alias(name)
    }
}

impl From<Callable> for Definition {
    #[inline]
    fn from(callable: Callable) -> Self {
        Self::Factory(callable)
    }
}

impl From<Instance> for Definition {
    #[inline]
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl<T: Injectable> From<Arc<T>> for Definition {
    #[inline]
    fn from(instance: Arc<T>) -> Self {
        Self::Instance(Instance::injectable_arc(instance))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Alias(String),
    Factory(Callable),
}

#[derive(Debug, Default)]
pub(crate) struct DefinitionTable {
    bindings: BTreeMap<String, Binding>,
}

impl DefinitionTable {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Follows the alias chain and returns the first name that isn't an alias
    #[must_use]
    pub(crate) fn resolve_name<'a>(&'a self, mut name: &'a str) -> &'a str {
        while let Some(Binding::Alias(target)) = self.bindings.get(name) {
            name = target.as_str();
        }
        name
    }

    /// Binds the end of the chain started at `name` to `target`.
    /// Defining a name as itself does nothing.
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::AliasCycle`] if `target` already resolves to the end of the chain
    pub(crate) fn set_alias(&mut self, name: &str, target: &str) -> Result<(), DefinitionErrorKind> {
        let resolved = self.resolve_name(name).to_string();
        if resolved == target {
            return Ok(());
        }
        if self.resolve_name(target) == resolved {
            return Err(DefinitionErrorKind::AliasCycle {
                name: resolved,
                target: target.to_string(),
            });
        }

        self.bindings.insert(resolved, Binding::Alias(target.to_string()));
        Ok(())
    }

    #[inline]
    pub(crate) fn set_factory(&mut self, name: &str, factory: Callable) {
        self.bindings.insert(name.to_string(), Binding::Factory(factory));
    }

    #[inline]
    #[must_use]
    pub(crate) fn factory(&self, name: &str) -> Option<&Callable> {
        match self.bindings.get(name) {
            Some(Binding::Factory(factory)) => Some(factory),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Definition, DefinitionTable};
    use crate::{callable::Callable, class::Injectable, errors::DefinitionErrorKind, value::Value};

    use alloc::sync::Arc;

    struct Service;

    impl Injectable for Service {
        const NAME: &'static str = "Service";

        fn allocate() -> Self {
            Self
        }
    }

    #[test]
    fn test_resolve_chain() {
        let mut table = DefinitionTable::new();
        table.set_alias("A", "B").unwrap();
        table.set_alias("B", "C").unwrap();

        assert_eq!(table.resolve_name("A"), "C");
        assert_eq!(table.resolve_name("B"), "C");
        assert_eq!(table.resolve_name("C"), "C");
        assert_eq!(table.resolve_name("unknown"), "unknown");
        assert!(table.contains("A"));
        assert!(!table.contains("C"));
    }

    #[test]
    fn test_realias_extends_chain() {
        let mut table = DefinitionTable::new();
        table.set_alias("A", "B").unwrap();
        table.set_alias("A", "C").unwrap();

        assert_eq!(table.resolve_name("A"), "C");
        assert_eq!(table.resolve_name("B"), "C");
    }

    #[test]
    fn test_self_alias_ignored() {
        let mut table = DefinitionTable::new();
        table.set_alias("A", "A").unwrap();
        table.set_alias("B", "A").unwrap();
        table.set_alias("B", "A").unwrap();

        assert!(!table.contains("A"));
        assert_eq!(table.resolve_name("B"), "A");
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let mut table = DefinitionTable::new();
        table.set_alias("A", "B").unwrap();
        table.set_alias("B", "C").unwrap();

        assert!(matches!(
            table.set_alias("C", "A"),
            Err(DefinitionErrorKind::AliasCycle { name, target }) if name == "C" && target == "A"
        ));
        assert_eq!(table.resolve_name("A"), "C");
    }

    #[test]
    fn test_instance_from_arc() {
        let service = Arc::new(Service);

        let Definition::Instance(instance) = Definition::from(service.clone()) else {
            panic!("instance definition expected");
        };
        assert!(Arc::ptr_eq(&instance.downcast::<Service>().unwrap(), &service));
        assert_eq!(instance.class_ref().map(|class_ref| class_ref.name), Some(Service::NAME));
    }

    #[test]
    fn test_factory_stops_chain() {
        let mut table = DefinitionTable::new();
        table.set_alias("A", "B").unwrap();
        table.set_factory("B", Callable::new([], |_| Ok(Value::Int(1))));

        assert_eq!(table.resolve_name("A"), "B");
        assert!(table.factory("B").is_some());
        assert!(table.factory("A").is_none());
    }
}
