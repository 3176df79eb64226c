//! # Stagehand Kernel
//!
//! The `kernel` module runs a process: a set of prioritized extensions
//! prepares a shared [`Container`](crate::container::Container), then a single
//! application runs against it, with a lifecycle event announced at every
//! step.
//!
//! ## Key Components:
//!
//! - **[`Kernel`]**: the trait every kernel implements (`run`, and extension
//!   registration by identity).
//! - **[`EventDrivenKernel`]**: the kernel implementation, announcing each
//!   stage through the container's event dispatcher and turning failures into
//!   an `OnError` event.
//! - **[`Extension`] / [`Application`]**: the behaviors a kernel runs, each
//!   either a closure or a type implementing [`Extend`] / [`Run`].
//! - **[`ExtensionRegistry`]**: priority buckets with stable ordering.
//! - **`constants`**: priorities, reserved event kinds and the dispatcher key.
//! - **`error`**: [`RunError`], [`LifecycleStage`] and the kernel [`Error`].
pub mod application;
pub mod constants;
pub mod error;
pub mod event_driven;
pub mod extension;
pub mod registry;

use std::sync::Arc;

use async_trait::async_trait;

pub use application::{Application, ApplicationBehavior, Run};
pub use error::{BoxError, Error, LifecycleStage, Result, RunError};
pub use event_driven::EventDrivenKernel;
pub use extension::{Extend, Extension, ExtensionBehavior, Priority};
pub use registry::ExtensionRegistry;

/// A kernel is a single way of running a process around a container.
#[async_trait]
pub trait Kernel: Send + Sync {
    /// Run an application, its extensions and the kernel's own extensions.
    async fn run(&self, application: Arc<Application>) -> Result<()>;

    /// Add a kernel extension
    fn add_extension(&self, extension: Arc<Extension>);

    /// Test if this exact extension is registered
    fn has_extension(&self, extension: &Arc<Extension>) -> bool;

    /// Remove an extension from the kernel, returning whether it was there
    fn remove_extension(&self, extension: &Arc<Extension>) -> bool;
}

// Test module declaration
#[cfg(test)]
mod tests;
