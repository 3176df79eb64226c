pub mod config;
pub mod container;
pub mod event;
pub mod kernel;

#[cfg(test)]
mod tests;

// Re-export key public types/traits for easier use by the binary and extensions
pub use config::KernelConfig;
pub use container::{Container, ServiceKey};
pub use event::{Event, EventDispatcher, EventGateway, EventKind, EventListener};
pub use kernel::error::Error as KernelError;
pub use kernel::{Application, EventDrivenKernel, Extend, Extension, Kernel, Run};
