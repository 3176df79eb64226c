//! # Stagehand Service Container
//!
//! A small keyed service container shared by everything a kernel run touches.
//! The kernel treats it as an opaque handle: the only thing it ever looks up
//! is the event dispatcher bound under
//! [`EVENT_DISPATCHER`](crate::kernel::constants::EVENT_DISPATCHER).
//!
//! Bindings are either constants or singletons built lazily by a factory on
//! first resolution. Keys are [`ServiceKey`] tokens that compare by identity,
//! so two keys created with the same name never collide.
pub mod error;

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

pub use error::ContainerError;

type SharedService = Arc<dyn Any + Send + Sync>;
type ServiceFactory = Box<dyn Fn(&Container) -> SharedService + Send + Sync>;

/// Ids below this value are reserved for keys declared by the crate itself.
const FIRST_UNIQUE_KEY_ID: u64 = 1 << 16;

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(FIRST_UNIQUE_KEY_ID);

/// Opaque identifier for a container binding.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey {
    id: u64,
    name: &'static str,
}

impl ServiceKey {
    /// Declare a key with a fixed id. Only used for the crate's reserved keys.
    pub(crate) const fn reserved(id: u64, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Mint a new key, distinct from every other key in the process.
    pub fn unique(name: &'static str) -> Self {
        let id = NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed);
        Self { id, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

enum Binding {
    Constant(SharedService),
    Singleton {
        factory: ServiceFactory,
        instance: OnceLock<SharedService>,
    },
}

impl Binding {
    fn resolve(&self, container: &Container) -> SharedService {
        match self {
            Binding::Constant(value) => value.clone(),
            Binding::Singleton { factory, instance } => {
                instance.get_or_init(|| factory(container)).clone()
            }
        }
    }
}

#[derive(Default)]
struct ContainerInner {
    bindings: RwLock<HashMap<ServiceKey, Arc<Binding>>>,
}

/// Cloneable handle to a shared service container.
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&'static str> = self.keys().iter().map(ServiceKey::name).collect();
        f.debug_struct("Container").field("bindings", &keys).finish()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both handles point at the same container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Bind a constant value under `key`.
    pub fn bind_constant<T>(&self, key: ServiceKey, value: T) -> Result<(), ContainerError>
    where
        T: Any + Send + Sync,
    {
        self.insert(key, Binding::Constant(Arc::new(value)))
    }

    /// Bind a factory whose result is built on first resolution and then
    /// shared by every later `get` on this container.
    pub fn bind_singleton<T, F>(&self, key: ServiceKey, factory: F) -> Result<(), ContainerError>
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.insert(key, singleton(factory))
    }

    /// Bind a singleton factory unless `key` is already bound. The check and
    /// the insert happen under one write lock. Returns whether it was bound.
    pub fn bind_singleton_if_absent<T, F>(&self, key: ServiceKey, factory: F) -> Result<bool, ContainerError>
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        let mut bindings = self.inner.bindings.write().map_err(|_| ContainerError::Poisoned)?;
        if bindings.contains_key(&key) {
            return Ok(false);
        }
        log::debug!("Binding default singleton for '{}'", key);
        bindings.insert(key, Arc::new(singleton(factory)));
        Ok(true)
    }

    pub fn is_bound(&self, key: ServiceKey) -> Result<bool, ContainerError> {
        let bindings = self.inner.bindings.read().map_err(|_| ContainerError::Poisoned)?;
        Ok(bindings.contains_key(&key))
    }

    /// Remove the binding for `key`, returning whether one existed.
    pub fn unbind(&self, key: ServiceKey) -> Result<bool, ContainerError> {
        let mut bindings = self.inner.bindings.write().map_err(|_| ContainerError::Poisoned)?;
        Ok(bindings.remove(&key).is_some())
    }

    /// Resolve `key` and clone the bound value out as a `T`.
    pub fn get<T>(&self, key: ServiceKey) -> Result<T, ContainerError>
    where
        T: Any + Clone,
    {
        // The binding is cloned out so factories may use the container freely.
        let binding = {
            let bindings = self.inner.bindings.read().map_err(|_| ContainerError::Poisoned)?;
            bindings
                .get(&key)
                .cloned()
                .ok_or(ContainerError::NotBound { key: key.name() })?
        };

        let service = binding.resolve(self);
        service
            .downcast_ref::<T>()
            .cloned()
            .ok_or(ContainerError::TypeMismatch {
                key: key.name(),
                expected: type_name::<T>(),
            })
    }

    /// Keys of every current binding, in no particular order.
    pub fn keys(&self) -> Vec<ServiceKey> {
        match self.inner.bindings.read() {
            Ok(bindings) => bindings.keys().copied().collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn singleton<T, F>(factory: F) -> Binding
where
    T: Any + Send + Sync,
    F: Fn(&Container) -> T + Send + Sync + 'static,
{
    Binding::Singleton {
        factory: Box::new(move |container| Arc::new(factory(container)) as SharedService),
        instance: OnceLock::new(),
    }
}

impl Container {
    fn insert(&self, key: ServiceKey, binding: Binding) -> Result<(), ContainerError> {
        let mut bindings = self.inner.bindings.write().map_err(|_| ContainerError::Poisoned)?;
        if bindings.contains_key(&key) {
            return Err(ContainerError::AlreadyBound { key: key.name() });
        }
        bindings.insert(key, Arc::new(binding));
        Ok(())
    }
}
