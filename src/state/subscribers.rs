use std::sync::{Arc, Mutex, PoisonError};

use crate::core::form_event::FormEvent;

pub type Listener = Arc<dyn Fn(&FormEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Listener registry. Listeners run on the notifying caller's thread, after
/// the form's own state lock is released, so they may read the form freely.
#[derive(Default)]
pub struct Subscribers {
    registry: Mutex<Registry>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&FormEvent) + Send + Sync + 'static) -> SubscriptionId {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let before = registry.listeners.len();
        registry.listeners.retain(|(existing, _)| *existing != id);
        registry.listeners.len() != before
    }

    pub fn notify(&self, events: &[FormEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<Listener> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for event in events {
            for listener in &listeners {
                listener(event);
            }
        }
    }
}
