use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
    sync::Arc,
    vec::Vec,
};
use core::{any::type_name, cell::RefCell};
use parking_lot::ReentrantMutex;
use tracing::{debug, error, info_span};

use crate::{
    allocator::{self, Allocator},
    any::Instance,
    callable::Callable,
    callback::{Callback, CallbackContext, CallbackRegistry, Phase},
    class::{Class, Injectable},
    config::Config,
    definition::{Definition, DefinitionTable},
    dependency_resolver::build_arguments,
    errors::{DefinitionErrorKind, InstantiateErrorKind, ResolveErrorKind},
    parameter::ClassRef,
    registry::{Early, InstanceRegistry},
    target::{FunctionTarget, MethodTarget},
    value::Value,
};

pub(crate) struct State {
    definitions: DefinitionTable,
    instances: InstanceRegistry,
    callbacks: CallbackRegistry,
    classes: BTreeMap<&'static str, Class>,
    allocator: Option<Allocator>,
}

impl State {
    fn new() -> Self {
        Self {
            definitions: DefinitionTable::new(),
            instances: InstanceRegistry::new(),
            callbacks: CallbackRegistry::new(),
            classes: BTreeMap::new(),
            allocator: None,
        }
    }

    #[inline]
    fn resolve_name(&self, name: &str) -> String {
        self.definitions.resolve_name(name).to_string()
    }

    fn class(&self, name: &str) -> Result<Class, ResolveErrorKind> {
        match self.classes.get(name) {
            Some(class) => Ok(class.clone()),
            None => {
                let err = ResolveErrorKind::NoClass { name: name.to_string() };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

pub(crate) struct ContainerInner {
    state: ReentrantMutex<RefCell<State>>,
    config: Config,
}

/// Name-keyed IoC container.
///
/// Clones share the same definitions, singletons and callbacks.
/// The whole resolution of a name, including nested resolutions made by constructors, callbacks and factories,
/// runs under one reentrant lock, so concurrent callers are serialized.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                state: ReentrantMutex::new(RefCell::new(State::new())),
                config,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config
    }

    /// Registers the class under its [`Injectable::NAME`], replacing a previous class with the same name
    pub fn register<T: Injectable>(&self) -> &Self {
        let guard = self.inner.state.lock();
        guard.borrow_mut().classes.insert(T::NAME, Class::of::<T>());
        debug!(class = T::NAME, "Class registered");
        self
    }

    pub(crate) fn ensure_class(&self, class_ref: &ClassRef) {
        if !self.inner.config.lazy_class_registration {
            return;
        }

        let guard = self.inner.state.lock();
        let mut state = guard.borrow_mut();
        if !state.classes.contains_key(class_ref.name) {
            state.classes.insert(class_ref.name, class_ref.describe());
            debug!(class = class_ref.name, "Class registered on first use");
        }
    }

    /// Gets the shared instance of the name, constructing it on the first call
    ///
    /// # Errors
    /// See [`Self::get_or_create_singleton`]
    #[inline]
    pub fn get(&self, name: &str) -> Result<Instance, ResolveErrorKind> {
        self.get_or_create_singleton(name, &[])
    }

    /// Typed version of [`Self::get`] resolving [`Injectable::NAME`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the name is bound to an object of another type
    /// - See [`Self::get_or_create_singleton`] for the rest
    pub fn get_as<T: Injectable>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        self.ensure_class(&ClassRef::of::<T>());
        downcast(&self.get(T::NAME)?)
    }

    /// Typed version of [`Self::create_new`] resolving [`Injectable::NAME`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the name is bound to an object of another type
    /// - See [`Self::create_new`] for the rest
    pub fn create_new_as<T: Injectable>(&self, arguments: &[Value]) -> Result<Arc<T>, ResolveErrorKind> {
        self.ensure_class(&ClassRef::of::<T>());
        downcast(&self.create_new(T::NAME, arguments)?)
    }

    /// Dispatches to [`Self::create_new`] if `new_instance` is set, otherwise to [`Self::get_or_create_singleton`]
    ///
    /// # Errors
    /// See the dispatched method
    #[inline]
    pub fn make(&self, name: &str, arguments: &[Value], new_instance: bool) -> Result<Instance, ResolveErrorKind> {
        if new_instance {
            self.create_new(name, arguments)
        } else {
            self.get_or_create_singleton(name, arguments)
        }
    }

    /// Returns the singleton of the resolved name, or constructs and stores it.
    /// Explicit arguments are only used if the singleton doesn't exist yet.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoClass`] if the resolved name isn't a registered class or a factory
    /// - Returns [`ResolveErrorKind::CircularDependency`] if the name is re-entered in a way that isn't allowed
    /// - Returns [`ResolveErrorKind::UnresolvableParameter`] if a constructor parameter can't be satisfied
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the allocator returns an object of another class
    /// - Returns errors of allocators, hooks, callbacks, constructors and factories, with nested resolve errors unwrapped
    #[inline]
    pub fn get_or_create_singleton(&self, name: &str, arguments: &[Value]) -> Result<Instance, ResolveErrorKind> {
        self.resolve(name, arguments, true)
    }

    /// Constructs a new instance of the resolved name, the singleton store isn't read or written
    ///
    /// # Errors
    /// See [`Self::get_or_create_singleton`]
    #[inline]
    pub fn create_new(&self, name: &str, arguments: &[Value]) -> Result<Instance, ResolveErrorKind> {
        self.resolve(name, arguments, false)
    }

    /// Returns `true` if the name has a definition, or its resolved name has a stored singleton or a construction in progress
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state.definitions.contains(name) || state.instances.has(state.definitions.resolve_name(name))
    }

    /// Returns `true` if the resolved name has a stored singleton or a construction in progress.
    /// A running factory isn't a construction in progress, it has no instance yet.
    #[must_use]
    pub fn has_instance(&self, name: &str) -> bool {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state.instances.has(state.definitions.resolve_name(name))
    }

    /// Returns `true` if the resolved name has a stored singleton
    #[must_use]
    pub fn is_singleton(&self, name: &str) -> bool {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state.instances.is_singleton(state.definitions.resolve_name(name))
    }

    /// Binds the name to an alias, a factory or a ready instance.
    ///
    /// An alias is attached to the end of the chain the name currently resolves to.
    /// An instance becomes the singleton of the name as is.
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::AliasCycle`] if the alias would make the chain loop
    pub fn define(&self, name: &str, definition: impl Into<Definition>) -> Result<&Self, DefinitionErrorKind> {
        let guard = self.inner.state.lock();
        let mut state = guard.borrow_mut();
        match definition.into() {
            Definition::Alias(target) => {
                if let Err(err) = state.definitions.set_alias(name, &target) {
                    error!("{}", err);
                    return Err(err);
                }
                debug!(name, target = target.as_str(), "Alias defined");
            }
            Definition::Factory(factory) => {
                state.definitions.set_factory(name, factory);
                debug!(name, "Factory defined");
            }
            Definition::Instance(instance) => {
                state.instances.insert_singleton(name, instance);
                debug!(name, "Instance defined");
            }
        }
        Ok(self)
    }

    /// Applies [`Self::define`] to every pair in order, stopping at the first error
    ///
    /// # Errors
    /// See [`Self::define`]
    pub fn define_many<I, N, D>(&self, definitions: I) -> Result<&Self, DefinitionErrorKind>
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: Into<Definition>,
    {
        for (name, definition) in definitions {
            self.define(name.as_ref(), definition)?;
        }
        Ok(self)
    }

    /// Follows the alias chain of the name, a name without an alias resolves to itself
    #[must_use]
    pub fn resolve_definition(&self, name: &str) -> String {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state.resolve_name(name)
    }

    /// Registers a lifecycle callback for the class, or for every class if the name is [`crate::WILDCARD`].
    /// Other names are resolved at registration, so aliases defined later don't affect it.
    pub fn register_callback<F>(&self, phase: Phase, name: &str, callback: F) -> &Self
    where
        F: Fn(&CallbackContext<'_>) -> Result<(), InstantiateErrorKind> + Send + Sync + 'static,
    {
        let guard = self.inner.state.lock();
        let mut state = guard.borrow_mut();
        let name = if name == crate::WILDCARD {
            name.to_string()
        } else {
            state.resolve_name(name)
        };
        let callback: Callback = Arc::new(callback);
        state.callbacks.register(phase, &name, callback);
        debug!(name = name.as_str(), ?phase, "Callback registered");
        self
    }

    /// Shortcut for [`Self::register_callback`] with [`Phase::Before`]
    #[inline]
    pub fn before<F>(&self, name: &str, callback: F) -> &Self
    where
        F: Fn(&CallbackContext<'_>) -> Result<(), InstantiateErrorKind> + Send + Sync + 'static,
    {
        self.register_callback(Phase::Before, name, callback)
    }

    /// Shortcut for [`Self::register_callback`] with [`Phase::After`]
    #[inline]
    pub fn after<F>(&self, name: &str, callback: F) -> &Self
    where
        F: Fn(&CallbackContext<'_>) -> Result<(), InstantiateErrorKind> + Send + Sync + 'static,
    {
        self.register_callback(Phase::After, name, callback)
    }

    /// Replaces the function producing bare objects, see [`Allocator`]
    pub fn set_allocator<F>(&self, allocator: F) -> &Self
    where
        F: Fn(&Class, &[Value]) -> Result<Instance, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let guard = self.inner.state.lock();
        let allocator: Allocator = Arc::new(allocator);
        guard.borrow_mut().allocator = Some(allocator);
        self
    }

    #[must_use]
    pub fn allocator(&self) -> Option<Allocator> {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state.allocator.clone()
    }

    /// Calls a method of a class with injected arguments.
    ///
    /// For a class name target, instance methods are called on the singleton of the resolved name, which is resolved if needed.
    /// A name bound to a ready instance uses the class of that instance.
    /// For an instance target, the class is taken from the instance, see [`MethodTarget::Instance`].
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoClass`] if the class isn't registered
    /// - Returns [`ResolveErrorKind::NoMethod`] if the class doesn't declare the method
    /// - Returns errors of the argument resolution and of the method itself
    pub fn invoke_method(&self, target: impl Into<MethodTarget>, method: &str, arguments: &[Value]) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("invoke_method", method);
        let _guard = span.enter();

        let (class, receiver) = match target.into() {
            MethodTarget::Class(name) => {
                let name = self.resolve_definition(&name);
                (self.class_of_name(&name)?, MethodReceiver::Singleton(name))
            }
            MethodTarget::Instance(instance) => (self.class_of_instance(&instance)?, MethodReceiver::Instance(instance)),
        };

        let Some(erased) = class.methods.get(method).cloned() else {
            let err = ResolveErrorKind::NoMethod {
                class: class.name().to_string(),
                method: method.to_string(),
            };
            error!("{}", err);
            return Err(err);
        };

        let receiver = match receiver {
            _ if erased.is_static => None,
            MethodReceiver::Instance(instance) => Some(instance),
            MethodReceiver::Singleton(name) => Some(self.get(&name)?),
        };
        let arguments = build_arguments(self, &erased.parameters, arguments)?;

        let value = (erased.invoke)(receiver.as_ref(), arguments).map_err(user_error)?;
        debug!(class = class.name(), "Method called");
        Ok(value)
    }

    /// Calls a callable or a factory definition with injected arguments, the result isn't cached
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoFunction`] if the name isn't bound to a factory
    /// - Returns errors of the argument resolution and of the function itself
    pub fn invoke_function(&self, target: impl Into<FunctionTarget>, arguments: &[Value]) -> Result<Value, ResolveErrorKind> {
        let callable = match target.into() {
            FunctionTarget::Callable(callable) => callable,
            FunctionTarget::Name(name) => {
                let guard = self.inner.state.lock();
                let state = guard.borrow();
                let Some(callable) = state.definitions.factory(state.definitions.resolve_name(&name)).cloned() else {
                    let err = ResolveErrorKind::NoFunction { name };
                    error!("{}", err);
                    return Err(err);
                };
                callable
            }
        };

        let span = info_span!("invoke_function", parameters = callable.parameters().len());
        let _guard = span.enter();

        let arguments = build_arguments(self, callable.parameters(), arguments)?;
        let value = callable.call(arguments).map_err(user_error)?;
        debug!("Function called");
        Ok(value)
    }

    fn class_of_ref(&self, class_ref: &ClassRef) -> Result<Class, ResolveErrorKind> {
        self.ensure_class(class_ref);
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state.class(class_ref.name)
    }

    /// Class of a resolved name: a registered class, or the class of an instance defined under the name
    fn class_of_name(&self, name: &str) -> Result<Class, ResolveErrorKind> {
        let defined = {
            let guard = self.inner.state.lock();
            let state = guard.borrow();
            if let Some(class) = state.classes.get(name) {
                return Ok(class.clone());
            }
            state.instances.singleton(name)
        };
        match defined {
            Some(instance) => self.class_of_instance(&instance),
            None => {
                let err = ResolveErrorKind::NoClass { name: name.to_string() };
                error!("{}", err);
                Err(err)
            }
        }
    }

    fn class_of_instance(&self, instance: &Instance) -> Result<Class, ResolveErrorKind> {
        if let Some(class_ref) = instance.class_ref() {
            return self.class_of_ref(class_ref);
        }

        let guard = self.inner.state.lock();
        let state = guard.borrow();
        let type_info = instance.type_info();
        if let Some(class) = state.classes.values().find(|class| class.type_info() == type_info) {
            return Ok(class.clone());
        }

        let err = ResolveErrorKind::NoClass {
            name: type_info.name.to_string(),
        };
        error!("{}", err);
        Err(err)
    }

    fn resolve(&self, name: &str, arguments: &[Value], singleton: bool) -> Result<Instance, ResolveErrorKind> {
        let guard = self.inner.state.lock();
        let state: &RefCell<State> = &guard;
        let name = state.borrow().resolve_name(name);

        let span = info_span!("resolve", name = name.as_str(), singleton);
        let _span_guard = span.enter();

        let allow_self_reference = self.inner.config.allow_singleton_self_reference;
        let (class, allocator) = {
            let state = state.borrow();
            if singleton {
                if let Some(instance) = state.instances.singleton(&name) {
                    debug!("Found in singleton store");
                    return Ok(instance);
                }
                debug!("Not found in singleton store");
            }
            if let Some(instance) = state.instances.reenter(&name, allow_self_reference)? {
                return Ok(instance);
            }
            if let Some(factory) = state.definitions.factory(&name).cloned() {
                drop(state);
                return self.resolve_factory(&guard, &name, &factory, arguments, singleton);
            }
            let class = state.class(&name)?;
            let allocator = state.allocator.clone();
            (class, allocator)
        };

        let instance = allocator::allocate(allocator.as_ref(), &class, arguments).map_err(user_error)?;
        if instance.type_info() != class.type_info() {
            let err = ResolveErrorKind::IncorrectType {
                expected: class.type_info().name,
                actual: instance.type_info().name,
            };
            error!("{}", err);
            return Err(err);
        }
        debug!("Allocated");

        let mut early = EarlyGuard::new(state, &name, singleton);
        if let Some(instance) = early.bind(Early::new(instance.clone(), singleton), allow_self_reference)? {
            return Ok(instance);
        }

        self.construct(state, &class, &name, &instance, arguments)?;
        early.commit(instance.clone());
        debug!("Constructed");

        Ok(instance)
    }

    fn resolve_factory(
        &self,
        state: &RefCell<State>,
        name: &str,
        factory: &Callable,
        arguments: &[Value],
        singleton: bool,
    ) -> Result<Instance, ResolveErrorKind> {
        let mut early = EarlyGuard::new(state, name, singleton);
        if let Some(instance) = early.bind(Early::BuildingFactory, self.inner.config.allow_singleton_self_reference)? {
            return Ok(instance);
        }

        let arguments = build_arguments(self, factory.parameters(), arguments)?;
        let instance = factory.call(arguments).map_err(user_error)?.into_instance();
        early.commit(instance.clone());
        debug!("Factory called");

        Ok(instance)
    }

    fn construct(&self, state: &RefCell<State>, class: &Class, name: &str, instance: &Instance, arguments: &[Value]) -> Result<(), ResolveErrorKind> {
        class.instance_create(instance, arguments).map_err(user_error)?;

        self.dispatch(
            state,
            Phase::Before,
            &CallbackContext {
                instance,
                name,
                arguments,
                class,
            },
        )?;

        let computed: Vec<Value>;
        let arguments = match &class.constructor {
            Some(constructor) => {
                let resolved = build_arguments(self, &constructor.parameters, arguments)?;
                computed = resolved.as_slice().to_vec();
                (constructor.invoke)(instance, resolved).map_err(user_error)?;
                debug!("Constructor called");
                computed.as_slice()
            }
            None => arguments,
        };

        self.dispatch(
            state,
            Phase::After,
            &CallbackContext {
                instance,
                name,
                arguments,
                class,
            },
        )
    }

    fn dispatch(&self, state: &RefCell<State>, phase: Phase, context: &CallbackContext<'_>) -> Result<(), ResolveErrorKind> {
        let callbacks = state.borrow().callbacks.collect(phase, context.name);
        if callbacks.is_empty() {
            return Ok(());
        }

        for callback in callbacks {
            callback(context).map_err(user_error)?;
        }
        debug!(?phase, "Callbacks called");
        Ok(())
    }
}

/// Object an instance method is called on
enum MethodReceiver {
    Instance(Instance),
    /// Singleton of the resolved name, resolved only if the method isn't static
    Singleton(String),
}

/// Early marker of a construction in progress.
/// Dropping the guard without a commit clears the marker and any partial singleton of the name.
struct EarlyGuard<'a> {
    state: &'a RefCell<State>,
    name: &'a str,
    singleton: bool,
    bound: bool,
}

impl<'a> EarlyGuard<'a> {
    #[inline]
    const fn new(state: &'a RefCell<State>, name: &'a str, singleton: bool) -> Self {
        Self {
            state,
            name,
            singleton,
            bound: false,
        }
    }

    /// Registers the marker, returns the singleton under construction instead if there is one
    fn bind(&mut self, early: Early, allow_self_reference: bool) -> Result<Option<Instance>, ResolveErrorKind> {
        let existing = self
            .state
            .borrow_mut()
            .instances
            .begin_early(self.name, early, allow_self_reference)?;
        self.bound = existing.is_none();
        Ok(existing)
    }

    fn commit(&mut self, instance: Instance) {
        self.state.borrow_mut().instances.commit(self.name, instance, self.singleton);
        self.bound = false;
    }
}

impl Drop for EarlyGuard<'_> {
    fn drop(&mut self) {
        if self.bound {
            self.state.borrow_mut().instances.rollback(self.name, self.singleton);
            debug!(name = self.name, "Construction rolled back");
        }
    }
}

/// Converts an error returned by user code, nested resolve errors are unwrapped
fn user_error(err: InstantiateErrorKind) -> ResolveErrorKind {
    let err = ResolveErrorKind::from(err);
    error!("{}", err);
    err
}

fn downcast<T: Injectable>(instance: &Instance) -> Result<Arc<T>, ResolveErrorKind> {
    instance.downcast::<T>().ok_or_else(|| {
        let err = ResolveErrorKind::IncorrectType {
            expected: type_name::<T>(),
            actual: instance.type_info().name,
        };
        error!("{}", err);
        err
    })
}
