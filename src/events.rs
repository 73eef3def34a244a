use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::matcher::Bindings;
use crate::method::Method;
use crate::route::Route;

pub type SubscriberId = u64;

pub type RouteListener = Arc<dyn Fn(&RouteActivation) + Send + Sync>;
pub type RouterListener = Arc<dyn Fn(&RouterEvent) + Send + Sync>;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Entry<E> {
    id: SubscriberId,
    once: bool,
    callback: Callback<E>,
}

/// Explicit subscriber list. Delivery is synchronous, in registration
/// order; a one-shot subscription removes itself after its first delivery.
/// A subscriber must not mutate the emitting object's route set while a
/// dispatch that triggered it is still scanning.
pub struct Notifier<E> {
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry<E>>>,
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> SubscriberId {
        self.register(Arc::new(callback), false)
    }

    /// Subscribes for exactly one delivery.
    pub fn once(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> SubscriberId {
        self.register(Arc::new(callback), true)
    }

    pub(crate) fn register(&self, callback: Callback<E>, once: bool) -> SubscriberId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().push(Entry { id, once, callback });
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub fn emit(&self, event: &E) {
        // Snapshot first so callbacks can subscribe/unsubscribe without
        // holding the list lock.
        let batch: Vec<(SubscriberId, bool, Callback<E>)> = self
            .entries
            .read()
            .iter()
            .map(|entry| (entry.id, entry.once, Arc::clone(&entry.callback)))
            .collect();
        if batch.is_empty() {
            return;
        }

        for (_, _, callback) in &batch {
            callback(event);
        }

        let fired: Vec<SubscriberId> = batch
            .iter()
            .filter(|(_, once, _)| *once)
            .map(|(id, _, _)| *id)
            .collect();
        if !fired.is_empty() {
            self.entries
                .write()
                .retain(|entry| !(entry.once && fired.contains(&entry.id)));
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries.read().len()
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Payload delivered on a successful dispatch, both to the matched route's
/// subscribers and, wrapped in [`RouterEvent::Success`], to the router's.
/// `data` is the caller's opaque value, threaded through untouched.
#[derive(Debug, Clone)]
pub struct RouteActivation {
    pub pathname: String,
    pub method: Option<Method>,
    pub route: Arc<Route>,
    pub arguments: Bindings,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub enum RouterEvent {
    Add {
        route: Arc<Route>,
    },
    Remove {
        route: Arc<Route>,
    },
    Success(RouteActivation),
    Fail {
        pathname: String,
        method: Option<Method>,
        data: Option<serde_json::Value>,
    },
}
