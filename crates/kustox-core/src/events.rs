//! Synchronous observer channels.
//!
//! Listeners run in registration order on the firing thread. A panicking
//! listener is logged and skipped; the rest still receive the event.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::{trace, warn};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ListenerList<T> = Mutex<Vec<(u64, Listener<T>)>>;

/// A single notification channel with an ordered subscriber list.
pub struct EventEmitter<T> {
    name: &'static str,
    listeners: Arc<ListenerList<T>>,
    next_id: AtomicU64,
}

impl<T: 'static> EventEmitter<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a listener. Delivery stops once the returned handle is
    /// disposed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener<T> = Arc::new(listener);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        trace!(target: "kustox::events", "{}: listener {} subscribed", self.name, id);

        let weak: Weak<ListenerList<T>> = Arc::downgrade(&self.listeners);
        let unregister: Box<dyn FnOnce() + Send> = Box::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(lid, _)| *lid != id);
            }
        });
        Subscription {
            unregister: Mutex::new(Some(unregister)),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn fire(&self, event: &T) {
        // Snapshot so listeners may subscribe or dispose during delivery.
        let snapshot: Vec<(u64, Listener<T>)> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for (id, listener) in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| (*listener)(event))).is_err() {
                warn!(target: "kustox::events", "{}: listener {} panicked during delivery", self.name, id);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle for a registered listener.
pub struct Subscription {
    unregister: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    /// Stop delivery. Safe to call more than once.
    pub fn dispose(&self) {
        let unregister = self
            .unregister
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(unregister) = unregister {
            unregister();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.unregister
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
