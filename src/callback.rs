use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
    sync::Arc,
    vec::Vec,
};

use crate::{any::Instance, class::Class, errors::InstantiateErrorKind, value::Value};

/// Key of callbacks that fire for every class
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// After allocation and the instance creation hook, before constructor arguments are resolved
    Before,
    /// After the constructor is called
    After,
}

/// Parameters passed to a lifecycle callback
#[derive(Debug)]
pub struct CallbackContext<'a> {
    pub instance: &'a Instance,
    /// Resolved name of the class
    pub name: &'a str,
    /// Raw explicit arguments for [`Phase::Before`], computed constructor arguments for [`Phase::After`]
    pub arguments: &'a [Value],
    pub class: &'a Class,
}

pub type Callback = Arc<dyn Fn(&CallbackContext<'_>) -> Result<(), InstantiateErrorKind> + Send + Sync>;

#[derive(Default)]
pub(crate) struct CallbackRegistry {
    callbacks: BTreeMap<(Phase, String), Vec<Callback>>,
}

impl CallbackRegistry {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn register(&mut self, phase: Phase, name: &str, callback: Callback) {
        self.callbacks.entry((phase, name.to_string())).or_default().push(callback);
    }

    /// Callbacks to dispatch for the class, wildcard ones first, each group in registration order
    #[must_use]
    pub(crate) fn collect(&self, phase: Phase, name: &str) -> Vec<Callback> {
        let wildcard = self.callbacks.get(&(phase, WILDCARD.to_string()));
        let specific = if name == WILDCARD {
            None
        } else {
            self.callbacks.get(&(phase, name.to_string()))
        };

        wildcard.into_iter().chain(specific).flatten().cloned().collect()
    }
}
