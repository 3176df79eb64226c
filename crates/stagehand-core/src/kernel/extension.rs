//! Extensions: units of behavior that prepare the container before the
//! application runs.
//!
//! An extension is either a closure ([`Extension::runner`]) or a type
//! implementing [`Extend`] ([`Extension::instance`]). Extensions are shared as
//! `Arc<Extension>` and the registry compares them by pointer, so two
//! extensions built from identical closures are still different extensions.
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::container::Container;
use crate::kernel::error::BoxError;

/// Extension ordering key; lower values run earlier.
pub type Priority = i32;

/// Object form of an extension.
pub trait Extend: Send + Sync {
    fn extend(&self, container: &Container) -> Result<(), BoxError>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

type ExtensionFn = Box<dyn Fn(&Container) -> Result<(), BoxError> + Send + Sync>;

/// The two shapes an extension can take
pub enum ExtensionBehavior {
    Runner(ExtensionFn),
    Instance(Box<dyn Extend>),
}

impl fmt::Debug for ExtensionBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionBehavior::Runner(_) => f.write_str("Runner"),
            ExtensionBehavior::Instance(instance) => write!(f, "Instance({})", instance.name()),
        }
    }
}

#[derive(Debug)]
pub struct Extension {
    name: String,
    priority: Mutex<Option<Priority>>,
    behavior: ExtensionBehavior,
}

impl Extension {
    /// Wrap a closure. It runs synchronously; anything it spawns is not awaited.
    pub fn runner<F>(extend: F) -> Self
    where
        F: Fn(&Container) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: "extension-runner".to_string(),
            priority: Mutex::new(None),
            behavior: ExtensionBehavior::Runner(Box::new(extend)),
        }
    }

    pub fn instance<X: Extend + 'static>(extension: X) -> Self {
        Self {
            name: extension.name().to_string(),
            priority: Mutex::new(None),
            behavior: ExtensionBehavior::Instance(Box::new(extension)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_priority(self, priority: Priority) -> Self {
        self.set_priority(priority);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behavior(&self) -> &ExtensionBehavior {
        &self.behavior
    }

    /// `None` until a priority is given or the extension is first registered.
    pub fn priority(&self) -> Option<Priority> {
        *self.priority.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_priority(&self, priority: Priority) {
        *self.priority.lock().unwrap_or_else(PoisonError::into_inner) = Some(priority);
    }

    /// Return the priority, storing `default` first if none is set.
    pub fn priority_or_insert(&self, default: Priority) -> Priority {
        *self
            .priority
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(default)
    }

    /// Apply the extension to `container`.
    pub fn extend(&self, container: &Container) -> Result<(), BoxError> {
        match &self.behavior {
            ExtensionBehavior::Runner(extend) => extend(container),
            ExtensionBehavior::Instance(instance) => instance.extend(container),
        }
    }
}
