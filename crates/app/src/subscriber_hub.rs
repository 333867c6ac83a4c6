//! Subscriber hub: the set of live listeners and the fan-out to them.
//!
//! Each listener owns a bounded queue. Broadcasting never waits: a listener
//! whose queue is closed or full is dropped from the set, and its receiver
//! drains what was already queued before reporting the end of the stream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use telerelay_domain::update::StateUpdate;

use crate::state_store::StateStore;

/// Default per-listener queue size.
pub const DEFAULT_LISTENER_CAPACITY: usize = 64;

/// Identifier of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Receiving end of one live subscription.
///
/// The first update is always a full snapshot; later ones are partial.
/// `recv` returns `None` once the hub has dropped this listener.
pub struct Listener {
    id: ListenerId,
    updates: mpsc::Receiver<Arc<StateUpdate>>,
}

impl Listener {
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Wait for the next update.
    pub async fn recv(&mut self) -> Option<Arc<StateUpdate>> {
        self.updates.recv().await
    }

    /// Take the next update if one is already queued.
    pub fn try_recv(&mut self) -> Option<Arc<StateUpdate>> {
        self.updates.try_recv().ok()
    }
}

type Senders = HashMap<ListenerId, mpsc::Sender<Arc<StateUpdate>>>;

/// Registered listeners and the fan-out to them.
pub struct SubscriberHub {
    store: Arc<StateStore>,
    capacity: usize,
    next_id: AtomicU64,
    listeners: Mutex<Senders>,
}

impl SubscriberHub {
    /// Create a hub reading snapshots from `store`, with `capacity` queued
    /// updates per listener (at least one).
    #[must_use]
    pub fn new(store: Arc<StateStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Add a listener and queue the complete current state as its first update.
    ///
    /// The snapshot is read while the listener set is locked, so no broadcast
    /// can slip between the snapshot and the registration.
    pub fn register(&self) -> Listener {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.capacity);

        let mut listeners = self.lock();
        let snapshot = Arc::new(self.store.snapshot());
        // Capacity is at least one and the queue is fresh.
        let _ = tx.try_send(snapshot);
        listeners.insert(id, tx);
        let count = listeners.len();
        drop(listeners);

        tracing::info!(listener = %id, count, "listener registered");
        Listener { id, updates: rx }
    }

    /// Remove a listener. Unknown or already removed ids are a no-op.
    ///
    /// Returns whether the listener was registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let removed = listeners.remove(&id).is_some();
        let count = listeners.len();
        drop(listeners);

        if removed {
            tracing::info!(listener = %id, count, "listener unregistered");
        }
        removed
    }

    /// Queue `update` for every registered listener.
    ///
    /// Returns the number of listeners the update was queued for. Listeners
    /// that cannot accept it are removed.
    pub fn broadcast(&self, update: StateUpdate) -> usize {
        let update = Arc::new(update);
        let mut listeners = self.lock();
        listeners.retain(|id, tx| match tx.try_send(Arc::clone(&update)) {
            Ok(()) => true,
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(listener = %id, "listener closed, removing");
                false
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(listener = %id, "listener queue full, disconnecting");
                false
            }
        });
        listeners.len()
    }

    /// Whether `id` is still registered.
    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Senders> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
