use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};

use crate::event::error::EventSystemError;
use crate::event::{Event, EventKind, EventListener, ListenerId, ListenerResult};

/// Completion signal returned by a dispatch. It resolves once every listener
/// bound to the kind at dispatch time has finished.
pub type Completion = BoxFuture<'static, Result<(), EventSystemError>>;

//--------------------------------------------------
// Dispatcher contract
//--------------------------------------------------

/// The surface the kernel needs from an event dispatcher.
pub trait EventDispatcher: Send + Sync + fmt::Debug {
    /// Issue `event` to the listeners of `kind`. The listener set is fixed
    /// when this is called; the returned future only drives them.
    fn dispatch(&self, kind: EventKind, event: Arc<dyn Event>) -> Completion;

    fn add_listener(&self, kind: EventKind, listener: Arc<dyn EventListener>) -> Result<ListenerId, EventSystemError>;

    fn remove_listener(&self, id: ListenerId) -> Result<bool, EventSystemError>;

    fn listener_count(&self, kind: EventKind) -> usize;
}

//--------------------------------------------------
// AsyncEventDispatcher (default implementation)
//--------------------------------------------------

type ListenerTable = HashMap<EventKind, Vec<(ListenerId, Arc<dyn EventListener>)>>;

/// Default dispatcher: listeners of one kind run concurrently and the
/// completion waits for all of them.
pub struct AsyncEventDispatcher {
    listeners: RwLock<ListenerTable>,
    next_listener_id: AtomicU64,
}

// Manual Debug implementation for AsyncEventDispatcher
impl fmt::Debug for AsyncEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count: usize = self
            .listeners
            .read()
            .map(|table| table.values().map(Vec::len).sum())
            .unwrap_or(0);
        f.debug_struct("AsyncEventDispatcher")
            .field("listener_count", &listener_count)
            .field("next_listener_id", &self.next_listener_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl AsyncEventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    fn snapshot(&self, kind: EventKind) -> Result<Vec<Arc<dyn EventListener>>, EventSystemError> {
        let table = self
            .listeners
            .read()
            .map_err(|_| EventSystemError::DispatcherPoisoned { component: "listeners" })?;
        Ok(table
            .get(&kind)
            .map(|bound| bound.iter().map(|(_, listener)| Arc::clone(listener)).collect())
            .unwrap_or_default())
    }
}

impl Default for AsyncEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher for AsyncEventDispatcher {
    fn dispatch(&self, kind: EventKind, event: Arc<dyn Event>) -> Completion {
        let listeners = match self.snapshot(kind) {
            Ok(listeners) => listeners,
            Err(e) => return future::ready(Err(e)).boxed(),
        };

        if listeners.is_empty() {
            return future::ready(Ok(())).boxed();
        }

        let pending = listeners.into_iter().map(move |listener| {
            let event = Arc::clone(&event);
            async move { listener.handle(event).await }
        });

        async move {
            let results = future::join_all(pending).await;
            match results.into_iter().find_map(Result::err) {
                Some(source) => Err(EventSystemError::ListenerFailed {
                    event_name: kind.name(),
                    source,
                }),
                None => Ok(()),
            }
        }
        .boxed()
    }

    fn add_listener(&self, kind: EventKind, listener: Arc<dyn EventListener>) -> Result<ListenerId, EventSystemError> {
        let mut table = self
            .listeners
            .write()
            .map_err(|_| EventSystemError::DispatcherPoisoned { component: "listeners" })?;
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        table.entry(kind).or_default().push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> Result<bool, EventSystemError> {
        let mut table = self
            .listeners
            .write()
            .map_err(|_| EventSystemError::DispatcherPoisoned { component: "listeners" })?;
        let mut found = false;
        table.values_mut().for_each(|bound| {
            let len_before = bound.len();
            bound.retain(|(listener_id, _)| *listener_id != id);
            if bound.len() < len_before {
                found = true;
            }
        });
        table.retain(|_, bound| !bound.is_empty());
        Ok(found)
    }

    fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .map(|table| table.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

//--------------------------------------------------
// Listener helpers
//--------------------------------------------------

/// Listener backed by an async closure (Internal Helper)
struct AsyncFnListener<F> {
    handler: F,
}

#[async_trait]
impl<F, Fut> EventListener for AsyncFnListener<F>
where
    F: Fn(Arc<dyn Event>) -> Fut + Send + Sync,
    Fut: Future<Output = ListenerResult> + Send + 'static,
{
    async fn handle(&self, event: Arc<dyn Event>) -> ListenerResult {
        (self.handler)(event).await
    }
}

/// Listener backed by a synchronous closure (Internal Helper)
struct SyncFnListener<F> {
    handler: F,
}

#[async_trait]
impl<F> EventListener for SyncFnListener<F>
where
    F: Fn(&dyn Event) -> ListenerResult + Send + Sync,
{
    async fn handle(&self, event: Arc<dyn Event>) -> ListenerResult {
        (self.handler)(&*event)
    }
}

/// Listener that only reacts to payloads of type `E` (Internal Helper)
struct TypedListener<E, F> {
    handler: F,
    _event: PhantomData<fn(&E)>,
}

#[async_trait]
impl<E, F> EventListener for TypedListener<E, F>
where
    E: Event,
    F: Fn(&E) -> ListenerResult + Send + Sync,
{
    async fn handle(&self, event: Arc<dyn Event>) -> ListenerResult {
        match event.downcast_ref::<E>() {
            Some(typed) => (self.handler)(typed),
            None => Ok(()),
        }
    }
}

/// Build a listener from an async closure.
pub fn async_listener<F, Fut>(handler: F) -> Arc<dyn EventListener>
where
    F: Fn(Arc<dyn Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ListenerResult> + Send + 'static,
{
    Arc::new(AsyncFnListener { handler })
}

/// Helper function to create synchronous listeners that are compatible with the async system
pub fn sync_listener<F>(handler: F) -> Arc<dyn EventListener>
where
    F: Fn(&dyn Event) -> ListenerResult + Send + Sync + 'static,
{
    Arc::new(SyncFnListener { handler })
}

/// Helper function to create typed synchronous listeners
pub fn typed_listener<E, F>(handler: F) -> Arc<dyn EventListener>
where
    E: Event,
    F: Fn(&E) -> ListenerResult + Send + Sync + 'static,
{
    Arc::new(TypedListener::<E, F> {
        handler,
        _event: PhantomData,
    })
}
