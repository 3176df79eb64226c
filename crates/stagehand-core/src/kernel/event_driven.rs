use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::config::KernelConfig;
use crate::container::Container;
use crate::event::dispatcher::EventDispatcher;
use crate::event::gateway::EventGateway;
use crate::event::types::{ApplicationEvent, ContainerEvent, ErrorEvent, ExtensionEvent};
use crate::event::{EventKind, EventListener, ListenerId};
use crate::kernel::Kernel;
use crate::kernel::application::Application;
use crate::kernel::constants::{
    AFTER_EXTENSION, AFTER_EXTENSIONS, AFTER_RUN, BEFORE_EXTENSION, BEFORE_EXTENSIONS, BEFORE_RUN, ON_ERROR, ON_STOP,
};
use crate::kernel::error::{Error, LifecycleStage, Result, RunError};
use crate::kernel::extension::Extension;
use crate::kernel::registry::ExtensionRegistry;

/// Kernel that announces every lifecycle stage through the event dispatcher
/// bound in its container.
///
/// A run goes `BeforeExtensions`, then `BeforeExtension` / extend /
/// `AfterExtension` for every extension in priority order, then
/// `AfterExtensions`, `BeforeRun`, the application, `AfterRun` and `OnStop`.
/// The `After*` events are emitted without waiting for their listeners.
///
/// Any failure along the way ends the run in the `OnError` stage instead:
/// the failure is dispatched as an [`ErrorEvent`] and `run` returns `Ok(())`.
/// Only a failure of that `OnError` dispatch is returned to the caller.
///
/// The registry is shared by every run on the kernel. Extensions carried by
/// an application are merged into it for good, so they also run on later
/// runs. Concurrent runs on one kernel see each other's merges; serialize
/// them if that matters.
#[derive(Debug)]
pub struct EventDrivenKernel {
    container: Container,
    gateway: EventGateway,
    extensions: Mutex<ExtensionRegistry>,
    config: KernelConfig,
}

impl EventDrivenKernel {
    /// Create a kernel over a fresh container
    pub fn new() -> Self {
        Self::with_container(Container::new())
    }

    pub fn with_container(container: Container) -> Self {
        Self::with_config(container, KernelConfig::default())
    }

    pub fn with_config(container: Container, config: KernelConfig) -> Self {
        let gateway =
            EventGateway::new(container.clone()).with_background_failure_reports(config.report_background_failures);
        Self {
            extensions: Mutex::new(ExtensionRegistry::with_default_priority(config.default_priority)),
            container,
            gateway,
            config,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn gateway(&self) -> &EventGateway {
        &self.gateway
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> Result<Arc<dyn EventDispatcher>> {
        Ok(self.gateway.dispatcher()?)
    }

    /// Shortcut to attach a listener for `OnError`
    pub fn add_error_listener(&self, listener: Arc<dyn EventListener>) -> Result<ListenerId> {
        self.add_listener(ON_ERROR, listener)
    }

    pub fn add_listener(&self, kind: EventKind, listener: Arc<dyn EventListener>) -> Result<ListenerId> {
        Ok(self.gateway.add_listener(kind, listener)?)
    }

    /// Number of registered extensions
    pub fn extension_count(&self) -> usize {
        self.registry().len()
    }

    // The registry is plain data and every mutation completes before the
    // guard drops, so a poisoned lock still holds a consistent registry.
    fn registry(&self) -> MutexGuard<'_, ExtensionRegistry> {
        self.extensions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stages `BeforeExtensions` through `OnStop`.
    async fn drive(&self, application: &Arc<Application>) -> std::result::Result<(), RunError> {
        let container = &self.container;

        self.gateway
            .dispatch(BEFORE_EXTENSIONS, ContainerEvent::new(container.clone()))
            .await
            .map_err(RunError::dispatch(LifecycleStage::BeforeExtensions))?;

        let ordered = {
            let mut registry = self.registry();
            if !application.extensions().is_empty() {
                log::debug!(
                    "Merging {} extension(s) from application '{}'",
                    application.extensions().len(),
                    application.name()
                );
            }
            registry.merge(application.extensions());
            registry.ordered_view()
        };

        for (priority, bucket) in ordered {
            for extension in bucket {
                let event = ExtensionEvent::new(container.clone(), Arc::clone(&extension));

                self.gateway
                    .dispatch(BEFORE_EXTENSION, event.clone())
                    .await
                    .map_err(RunError::dispatch(LifecycleStage::BeforeExtension))?;

                log::debug!("Applying extension '{}' (priority {})", extension.name(), priority);
                extension.extend(container).map_err(|source| RunError::Extension {
                    extension: extension.name().to_string(),
                    source,
                })?;

                self.gateway
                    .emit(AFTER_EXTENSION, event)
                    .map_err(RunError::dispatch(LifecycleStage::AfterExtension))?;
            }
        }

        self.gateway
            .emit(AFTER_EXTENSIONS, ContainerEvent::new(container.clone()))
            .map_err(RunError::dispatch(LifecycleStage::AfterExtensions))?;

        let application_event = ApplicationEvent::new(container.clone(), Arc::clone(application));

        self.gateway
            .dispatch(BEFORE_RUN, application_event.clone())
            .await
            .map_err(RunError::dispatch(LifecycleStage::BeforeRun))?;

        log::debug!("Running application '{}'", application.name());
        application.run(container).await.map_err(|source| RunError::Application {
            application: application.name().to_string(),
            source,
        })?;

        self.gateway
            .emit(AFTER_RUN, application_event.clone())
            .map_err(RunError::dispatch(LifecycleStage::AfterRun))?;

        self.gateway
            .dispatch(ON_STOP, application_event)
            .await
            .map_err(RunError::dispatch(LifecycleStage::OnStop))?;

        Ok(())
    }

    /// Terminal stage for a failed run.
    async fn fail(&self, failure: RunError) -> Result<()> {
        log::error!("[{}] Run failed during {}: {}", self.config.name, failure.stage(), failure);

        let failure = Arc::new(failure);
        let event = ErrorEvent::new(self.container.clone(), Arc::clone(&failure));

        self.gateway
            .dispatch(ON_ERROR, event)
            .await
            .map_err(|source| Error::ErrorStage { failure, source })
    }
}

impl Default for EventDrivenKernel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Kernel for EventDrivenKernel {
    async fn run(&self, application: Arc<Application>) -> Result<()> {
        log::info!("[{}] Running '{}'", self.config.name, application.name());

        match self.drive(&application).await {
            Ok(()) => {
                log::info!("[{}] '{}' completed", self.config.name, application.name());
                Ok(())
            }
            Err(failure) => self.fail(failure).await,
        }
    }

    fn add_extension(&self, extension: Arc<Extension>) {
        self.registry().add(extension);
    }

    fn has_extension(&self, extension: &Arc<Extension>) -> bool {
        self.registry().has(extension)
    }

    fn remove_extension(&self, extension: &Arc<Extension>) -> bool {
        self.registry().remove(extension)
    }
}
