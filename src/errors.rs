mod container;
mod dependency_resolver;
mod instantiate;

pub use container::DefinitionErrorKind;
pub use dependency_resolver::ResolveErrorKind;
pub use instantiate::InstantiateErrorKind;
