//! # Stagehand Event System
//!
//! Lifecycle notifications travel through an [`EventDispatcher`]: a payload
//! implementing [`Event`] is dispatched under an [`EventKind`] and fanned out
//! to every [`EventListener`] bound to that kind.
//!
//! - `dispatcher`: the dispatcher contract and the default
//!   [`AsyncEventDispatcher`], plus helpers to build listeners from closures.
//! - `gateway`: [`EventGateway`], which finds (or installs) the dispatcher in a
//!   container and offers blocking and non-blocking dispatch.
//! - `types`: the lifecycle payloads dispatched by the kernel.
//! - `error`: [`EventSystemError`].
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod types;

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::container::Container;
use crate::kernel::error::BoxError;

/// Type for listener identifiers
pub type ListenerId = u64;

/// Outcome of a single listener invocation
pub type ListenerResult = Result<(), BoxError>;

const FIRST_UNIQUE_KIND_ID: u64 = 1 << 16;

static NEXT_KIND_ID: AtomicU64 = AtomicU64::new(FIRST_UNIQUE_KIND_ID);

/// Opaque event identifier. Kinds compare by id, so two kinds that share a
/// name are still different kinds.
#[derive(Debug, Clone, Copy)]
pub struct EventKind {
    id: u64,
    name: &'static str,
}

impl EventKind {
    pub(crate) const fn reserved(id: u64, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Mint a kind that is distinct from every other kind in the process.
    pub fn unique(name: &'static str) -> Self {
        let id = NEXT_KIND_ID.fetch_add(1, Ordering::Relaxed);
        Self { id, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKind {}

impl Hash for EventKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Get the name of this payload type
    fn name(&self) -> &'static str;

    /// The container the event was raised for
    fn container(&self) -> &Container;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl dyn Event {
    /// Downcast the payload to a concrete event type.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

/// Asynchronous event listener trait
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn handle(&self, event: Arc<dyn Event>) -> ListenerResult;
}

/// Re-export important types
pub use dispatcher::{AsyncEventDispatcher, Completion, EventDispatcher, async_listener, sync_listener, typed_listener};
pub use error::EventSystemError;
pub use gateway::EventGateway;
pub use types::{ApplicationEvent, ContainerEvent, ErrorEvent, ExtensionEvent};

// Test module declaration
#[cfg(test)]
mod tests;
