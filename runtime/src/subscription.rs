//! Subscription registry shared by a store and the handles it gives out.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// A registered observer
pub(crate) type Observer = Arc<dyn Fn() + Send + Sync>;

/// Observers copied out of the registry at the start of a dispatch
pub(crate) type ObserverSnapshot = SmallVec<[Observer; 8]>;

/// Identifier of a registered observer, unique per store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

pub(crate) struct SubscriberRegistry {
    store_name: String,
    next_id: AtomicU64,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
}

impl SubscriberRegistry {
    pub(crate) fn new(store_name: String) -> Self {
        Self {
            store_name,
            next_id: AtomicU64::new(0),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn register(&self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let count = {
            let mut observers = self.observers.lock();
            observers.push((id, observer));
            observers.len()
        };

        tracing::trace!(store = %self.store_name, subscription = %id, "Observer subscribed");
        self.record_count(count);
        id
    }

    /// Returns `false` if `id` was not registered
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let (removed, count) = {
            let mut observers = self.observers.lock();
            let before = observers.len();
            observers.retain(|(registered, _)| *registered != id);
            (observers.len() != before, observers.len())
        };

        if removed {
            tracing::trace!(store = %self.store_name, subscription = %id, "Observer unsubscribed");
            self.record_count(count);
        }
        removed
    }

    /// Registration-ordered copy of the current observers
    pub(crate) fn snapshot(&self) -> ObserverSnapshot {
        self.observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.lock().len()
    }

    #[allow(clippy::cast_precision_loss)] // observer counts stay far below 2^52
    fn record_count(&self, count: usize) {
        metrics::gauge!(crate::metrics::SUBSCRIBERS, "store" => self.store_name.clone())
            .set(count as f64);
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe)
///
/// Call [`unsubscribe`](Self::unsubscribe) to stop notifications. Dropping the
/// handle does *not* unsubscribe; the observer then stays registered for the
/// store's lifetime.
#[must_use = "dropping a Subscription keeps the observer registered; call `unsubscribe` to remove it"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<SubscriberRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: &Arc<SubscriberRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// This subscription's identifier
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Deregister the observer
    ///
    /// Notifications already in flight still reach it. Returns `false` if the
    /// observer was already gone (or the store was dropped).
    #[allow(clippy::must_use_candidate)]
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("store_alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}
