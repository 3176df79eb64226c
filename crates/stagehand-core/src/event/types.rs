use std::any::Any;
use std::sync::Arc;

use crate::container::Container;
use crate::event::Event;
use crate::kernel::application::Application;
use crate::kernel::error::RunError;
use crate::kernel::extension::Extension;

/// Raised around the extension phase as a whole
#[derive(Debug, Clone)]
pub struct ContainerEvent {
    pub container: Container,
}

impl ContainerEvent {
    pub fn new(container: Container) -> Self {
        Self { container }
    }
}

/// Raised before and after each extension
#[derive(Debug, Clone)]
pub struct ExtensionEvent {
    pub container: Container,
    pub extension: Arc<Extension>,
}

impl ExtensionEvent {
    pub fn new(container: Container, extension: Arc<Extension>) -> Self {
        Self { container, extension }
    }
}

/// Raised around the application run and when the kernel stops
#[derive(Debug, Clone)]
pub struct ApplicationEvent {
    pub container: Container,
    pub application: Arc<Application>,
}

impl ApplicationEvent {
    pub fn new(container: Container, application: Arc<Application>) -> Self {
        Self { container, application }
    }
}

/// Raised once when a run fails
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub container: Container,
    pub error: Arc<RunError>,
}

impl ErrorEvent {
    pub fn new(container: Container, error: Arc<RunError>) -> Self {
        Self { container, error }
    }
}

macro_rules! impl_event {
    ($($event:ty => $name:literal),* $(,)?) => {
        $(
            impl Event for $event {
                fn name(&self) -> &'static str {
                    $name
                }

                fn container(&self) -> &Container {
                    &self.container
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }
            }
        )*
    };
}

impl_event! {
    ContainerEvent => "container",
    ExtensionEvent => "extension",
    ApplicationEvent => "application",
    ErrorEvent => "error",
}
