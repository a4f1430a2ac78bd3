//! Change notification registry.
//!
//! Repositories fan out a synchronous notification to every subscriber
//! after each successful write (no batching, no async delivery).
//! Subscription handles are explicit ids so unsubscribe stays O(1).

use std::collections::HashMap;

/// Handle returned by [`ObserverRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry of change listeners for one event type
pub struct ObserverRegistry<E> {
    next_id: u64,
    listeners: HashMap<u64, Box<dyn Fn(&E)>>,
}

impl<E> Default for ObserverRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ObserverRegistry<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: HashMap::new(),
        }
    }

    /// Register a listener; the returned id disposes it via [`Self::unsubscribe`]
    pub fn subscribe(&mut self, listener: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        SubscriptionId(id)
    }

    /// Remove a listener; returns false if the id was already disposed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id.0).is_some()
    }

    /// Synchronously invoke every registered listener
    pub fn notify(&self, event: &E) {
        for listener in self.listeners.values() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
