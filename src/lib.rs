#![no_std]

extern crate alloc;

pub(crate) mod allocator;
pub(crate) mod any;
pub(crate) mod callable;
pub(crate) mod callback;
pub(crate) mod class;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod definition;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod parameter;
pub(crate) mod registry;
pub(crate) mod target;
pub(crate) mod value;

pub use allocator::Allocator;
pub use any::{Instance, TypeInfo};
pub use callable::Callable;
pub use callback::{Callback, CallbackContext, Phase, WILDCARD};
pub use class::{Class, Constructor, ConstructorFn, Injectable, InstanceMethodFn, Method, Receiver, StaticMethodFn};
pub use config::Config;
pub use container::Container;
pub use definition::Definition;
pub use errors::{DefinitionErrorKind, InstantiateErrorKind, ResolveErrorKind};
pub use parameter::{ClassRef, Parameter, ParameterKind};
pub use target::{FunctionTarget, MethodTarget};
pub use value::{Arguments, Value};
