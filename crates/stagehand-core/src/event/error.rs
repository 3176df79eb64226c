//! # Stagehand Event System Errors
//!
//! Defines [`EventSystemError`], covering listener failures surfaced by a
//! dispatch completion, dispatcher lookup problems and poisoned listener
//! tables.
use thiserror::Error;

use crate::container::ContainerError;
use crate::kernel::error::BoxError;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Listener for event '{event_name}' failed: {source}")]
    ListenerFailed {
        event_name: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Attempted to operate on a poisoned event dispatcher component: {component}")]
    DispatcherPoisoned {
        component: &'static str, // e.g., "listeners"
    },

    #[error("Event dispatcher could not be resolved from the container: {0}")]
    DispatcherUnavailable(#[from] ContainerError),

    #[error("Could not detach non-blocking dispatch of '{event_name}': {source}")]
    DetachFailed {
        event_name: &'static str,
        #[source]
        source: std::io::Error,
    },
}
