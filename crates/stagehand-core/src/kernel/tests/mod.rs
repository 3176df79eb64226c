
#[cfg(test)]
pub(super) mod support {
    use std::sync::{Arc, Mutex};

    use crate::container::Container;
    use crate::event::dispatcher::{AsyncEventDispatcher, Completion, EventDispatcher};
    use crate::event::error::EventSystemError;
    use crate::event::gateway::EventGateway;
    use crate::event::{Event, EventKind, EventListener, ListenerId};

    /// Dispatcher that records every dispatch before delegating to the
    /// default implementation.
    #[derive(Debug, Default)]
    pub struct RecordingDispatcher {
        inner: AsyncEventDispatcher,
        dispatched: Mutex<Vec<(EventKind, Arc<dyn Event>)>>,
    }

    impl RecordingDispatcher {
        /// Bind a new recorder into `container` and return it.
        pub fn install(container: &Container) -> Arc<Self> {
            let recorder = Arc::new(Self::default());
            EventGateway::bind_dispatcher(container, recorder.clone()).expect("dispatcher should bind");
            recorder
        }

        pub fn kinds(&self) -> Vec<EventKind> {
            self.dispatched.lock().unwrap().iter().map(|(kind, _)| *kind).collect()
        }

        pub fn events_of(&self, kind: EventKind) -> Vec<Arc<dyn Event>> {
            self.dispatched
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, event)| Arc::clone(event))
                .collect()
        }
    }

    impl EventDispatcher for RecordingDispatcher {
        fn dispatch(&self, kind: EventKind, event: Arc<dyn Event>) -> Completion {
            self.dispatched.lock().unwrap().push((kind, Arc::clone(&event)));
            self.inner.dispatch(kind, event)
        }

        fn add_listener(&self, kind: EventKind, listener: Arc<dyn EventListener>) -> Result<ListenerId, EventSystemError> {
            self.inner.add_listener(kind, listener)
        }

        fn remove_listener(&self, id: ListenerId) -> Result<bool, EventSystemError> {
            self.inner.remove_listener(id)
        }

        fn listener_count(&self, kind: EventKind) -> usize {
            self.inner.listener_count(kind)
        }
    }

    /// Shared, ordered trace of what ran.
    pub type Trace = Arc<Mutex<Vec<String>>>;

    pub fn trace() -> Trace {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn entries(trace: &Trace) -> Vec<String> {
        trace.lock().unwrap().clone()
    }
}
