//! Facade over the dispatcher bound in a container.
//!
//! The dispatcher is looked up under
//! [`EVENT_DISPATCHER`](crate::kernel::constants::EVENT_DISPATCHER) on every
//! operation. When nothing is bound there, an [`AsyncEventDispatcher`] is
//! installed as a singleton of that container first, so every gateway over
//! the same container shares one dispatcher. The lookup only takes the
//! container's write lock while that default is being installed.
use std::sync::Arc;
use std::thread;

use futures::executor::block_on;
use tokio::runtime::Handle;

use crate::container::Container;
use crate::event::dispatcher::{AsyncEventDispatcher, EventDispatcher};
use crate::event::error::EventSystemError;
use crate::event::{Event, EventKind, EventListener, ListenerId};
use crate::kernel::constants::EVENT_DISPATCHER;

#[derive(Debug, Clone)]
pub struct EventGateway {
    container: Container,
    report_background_failures: bool,
}

impl EventGateway {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            report_background_failures: true,
        }
    }

    /// Choose whether failed non-blocking dispatches are logged at `warn`
    /// (the default) or only at `debug`.
    pub fn with_background_failure_reports(mut self, report: bool) -> Self {
        self.report_background_failures = report;
        self
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Bind a caller-provided dispatcher, so the default is never installed.
    pub fn bind_dispatcher(container: &Container, dispatcher: Arc<dyn EventDispatcher>) -> Result<(), EventSystemError> {
        Ok(container.bind_constant(EVENT_DISPATCHER, dispatcher)?)
    }

    /// The container's dispatcher, installing the default one if needed.
    pub fn dispatcher(&self) -> Result<Arc<dyn EventDispatcher>, EventSystemError> {
        if !self.container.is_bound(EVENT_DISPATCHER)? {
            self.container.bind_singleton_if_absent(EVENT_DISPATCHER, |_| {
                Arc::new(AsyncEventDispatcher::new()) as Arc<dyn EventDispatcher>
            })?;
        }
        Ok(self.container.get::<Arc<dyn EventDispatcher>>(EVENT_DISPATCHER)?)
    }

    /// Blocking dispatch: waits until every listener bound to `kind` is done.
    pub async fn dispatch<E: Event>(&self, kind: EventKind, event: E) -> Result<(), EventSystemError> {
        log::debug!("Dispatching '{}' (blocking)", kind);
        let completion = self.dispatcher()?.dispatch(kind, Arc::new(event));
        completion.await
    }

    /// Non-blocking dispatch. The listener set is captured now, in call
    /// order. The completion runs as a detached task on the current tokio
    /// runtime, or on its own thread when there is none.
    pub fn emit<E: Event>(&self, kind: EventKind, event: E) -> Result<(), EventSystemError> {
        log::debug!("Dispatching '{}' (non-blocking)", kind);
        let completion = self.dispatcher()?.dispatch(kind, Arc::new(event));
        let report = self.report_background_failures;
        let detached = async move {
            if let Err(e) = completion.await {
                if report {
                    log::warn!("Non-blocking dispatch of '{}' failed: {}", kind, e);
                } else {
                    log::debug!("Non-blocking dispatch of '{}' failed: {}", kind, e);
                }
            }
        };

        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(detached);
            }
            Err(_) => {
                thread::Builder::new()
                    .name(format!("stagehand-emit-{}", kind))
                    .spawn(move || block_on(detached))
                    .map_err(|source| EventSystemError::DetachFailed {
                        event_name: kind.name(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    pub fn add_listener(&self, kind: EventKind, listener: Arc<dyn EventListener>) -> Result<ListenerId, EventSystemError> {
        self.dispatcher()?.add_listener(kind, listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> Result<bool, EventSystemError> {
        self.dispatcher()?.remove_listener(id)
    }
}
