use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum DefinitionErrorKind {
    #[error("Alias {name} -> {target} would create a cycle, because {target} already resolves to {name}")]
    AliasCycle { name: String, target: String },
}
