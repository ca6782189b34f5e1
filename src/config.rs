/// Config for a container
/// ## Fields
/// - `allow_singleton_self_reference`:
///   If `true`, a singleton that is still under construction can be injected into itself
///   (directly or through other dependencies), the partially constructed instance is returned.
///   If `false`, every re-entrant construction of the same name is a circular dependency.
///
///   Transient self reference is never allowed.
/// - `lazy_class_registration`:
///   If `true`, classes used as parameter types are registered on first use.
///   If `false`, only classes registered by [`crate::Container::register`] are resolvable.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub allow_singleton_self_reference: bool,
    pub lazy_class_registration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_singleton_self_reference: true,
            lazy_class_registration: true,
        }
    }
}
