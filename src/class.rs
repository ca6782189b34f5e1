use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::{Instance, TypeInfo},
    errors::InstantiateErrorKind,
    parameter::Parameter,
    value::{Arguments, Value},
};

/// A type the container can construct by name.
///
/// Construction is split the same way for every class: [`Injectable::allocate`] produces a bare object,
/// then the container runs the instance creation hook and the constructor on the already shared object.
/// Because of that, state set by the constructor is written through interior mutability.
///
/// # Example
/// ```rust
/// use std::sync::{Arc, OnceLock};
/// use wirebox::{Constructor, Container, Injectable, Parameter};
///
/// struct Config;
///
/// impl Injectable for Config {
///     const NAME: &'static str = "Config";
///
///     fn allocate() -> Self {
///         Self
///     }
/// }
///
/// struct Service {
///     config: OnceLock<Arc<Config>>,
///     retries: OnceLock<i64>,
/// }
///
/// impl Injectable for Service {
///     const NAME: &'static str = "Service";
///
///     fn allocate() -> Self {
///         Self {
///             config: OnceLock::new(),
///             retries: OnceLock::new(),
///         }
///     }
///
///     fn constructor() -> Option<Constructor<Self>> {
///         Some(Constructor::new(
///             [Parameter::class::<Config>("config"), Parameter::scalar("retries").with_default(3)],
///             |this: &Self, args| {
///                 let _ = this.config.set(args.object::<Config>(0)?);
///                 let _ = this.retries.set(args.int(1)?);
///                 Ok(())
///             },
///         ))
///     }
/// }
///
/// let container = Container::new();
/// let service = container.get_as::<Service>().unwrap();
/// assert_eq!(service.retries.get(), Some(&3));
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    const NAME: &'static str;

    /// Creates a bare object, the constructor isn't called yet
    #[must_use]
    fn allocate() -> Self;

    /// `None` means the class has no public constructor, so its arguments aren't resolved
    #[must_use]
    fn constructor() -> Option<Constructor<Self>> {
        None
    }

    /// Called with the raw explicit arguments right after allocation, before any injection
    ///
    /// # Errors
    /// An error aborts the construction and is returned to the caller
    fn instance_create(&self, _arguments: &[Value]) -> Result<(), InstantiateErrorKind> {
        Ok(())
    }

    #[must_use]
    fn methods() -> Vec<Method<Self>> {
        Vec::new()
    }
}

pub type ConstructorFn<T> = fn(&T, Arguments) -> Result<(), InstantiateErrorKind>;
pub type StaticMethodFn = fn(Arguments) -> Result<Value, InstantiateErrorKind>;
pub type InstanceMethodFn<T> = fn(&T, Arguments) -> Result<Value, InstantiateErrorKind>;

pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    invoke: ConstructorFn<T>,
}

impl<T> Constructor<T> {
    #[inline]
    #[must_use]
    pub fn new(parameters: impl IntoIterator<Item = Parameter>, invoke: ConstructorFn<T>) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
            invoke,
        }
    }
}

pub enum Receiver<T> {
    Static(StaticMethodFn),
    Instance(InstanceMethodFn<T>),
}

pub struct Method<T> {
    name: &'static str,
    parameters: Vec<Parameter>,
    receiver: Receiver<T>,
}

impl<T> Method<T> {
    #[inline]
    #[must_use]
    pub fn new(name: &'static str, parameters: impl IntoIterator<Item = Parameter>, invoke: InstanceMethodFn<T>) -> Self {
        Self {
            name,
            parameters: parameters.into_iter().collect(),
            receiver: Receiver::Instance(invoke),
        }
    }

    #[inline]
    #[must_use]
    pub fn new_static(name: &'static str, parameters: impl IntoIterator<Item = Parameter>, invoke: StaticMethodFn) -> Self {
        Self {
            name,
            parameters: parameters.into_iter().collect(),
            receiver: Receiver::Static(invoke),
        }
    }
}

type ErasedConstructorFn = Arc<dyn Fn(&Instance, Arguments) -> Result<(), InstantiateErrorKind> + Send + Sync>;
type ErasedMethodFn = Arc<dyn Fn(Option<&Instance>, Arguments) -> Result<Value, InstantiateErrorKind> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct ErasedConstructor {
    pub(crate) parameters: Arc<[Parameter]>,
    pub(crate) invoke: ErasedConstructorFn,
}

#[derive(Clone)]
pub(crate) struct ErasedMethod {
    pub(crate) parameters: Arc<[Parameter]>,
    pub(crate) is_static: bool,
    pub(crate) invoke: ErasedMethodFn,
}

/// Type-erased class metadata, built once per type
#[derive(Clone)]
pub struct Class {
    name: &'static str,
    type_info: TypeInfo,
    allocate: fn() -> Instance,
    instance_create: fn(&Instance, &[Value]) -> Result<(), InstantiateErrorKind>,
    pub(crate) constructor: Option<ErasedConstructor>,
    pub(crate) methods: Arc<BTreeMap<&'static str, ErasedMethod>>,
}

impl Class {
    #[must_use]
    pub fn of<T: Injectable>() -> Self {
        let constructor = T::constructor().map(|Constructor { parameters, invoke }| ErasedConstructor {
            parameters: parameters.into(),
            invoke: Arc::new(move |instance: &Instance, arguments| invoke(receiver::<T>(instance)?, arguments)),
        });
        let methods = T::methods()
            .into_iter()
            .map(|Method { name, parameters, receiver: kind }| {
                let is_static = matches!(kind, Receiver::Static(_));
                let invoke: ErasedMethodFn = match kind {
                    Receiver::Static(invoke) => Arc::new(move |_: Option<&Instance>, arguments| invoke(arguments)),
                    Receiver::Instance(invoke) => Arc::new(move |instance: Option<&Instance>, arguments| {
                        let instance = instance.ok_or(InstantiateErrorKind::IncorrectReceiver {
                            expected: T::NAME,
                            actual: "null",
                        })?;
                        invoke(receiver::<T>(instance)?, arguments)
                    }),
                };
                (
                    name,
                    ErasedMethod {
                        parameters: parameters.into(),
                        is_static,
                        invoke,
                    },
                )
            })
            .collect();

        Self {
            name: T::NAME,
            type_info: TypeInfo::of::<T>(),
            allocate: allocate::<T>,
            instance_create: instance_create::<T>,
            constructor,
            methods: Arc::new(methods),
        }
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Allocates a bare object of the class without calling its constructor
    #[inline]
    #[must_use]
    pub fn allocate(&self) -> Instance {
        (self.allocate)()
    }

    #[inline]
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Constructor parameters, `None` if the class has no public constructor
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.constructor.as_ref().map(|constructor| &*constructor.parameters)
    }

    #[inline]
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    #[inline]
    pub(crate) fn instance_create(&self, instance: &Instance, arguments: &[Value]) -> Result<(), InstantiateErrorKind> {
        (self.instance_create)(instance, arguments)
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("type", &self.type_info.name)
            .field("parameters", &self.parameters())
            .field("methods", &self.methods.keys())
            .finish()
    }
}

fn allocate<T: Injectable>() -> Instance {
    Instance::injectable(T::allocate())
}

fn instance_create<T: Injectable>(instance: &Instance, arguments: &[Value]) -> Result<(), InstantiateErrorKind> {
    receiver::<T>(instance)?.instance_create(arguments)
}

#[inline]
fn receiver<T: Injectable>(instance: &Instance) -> Result<&T, InstantiateErrorKind> {
    instance.downcast_ref().ok_or(InstantiateErrorKind::IncorrectReceiver {
        expected: T::NAME,
        actual: instance.type_info().name,
    })
}
