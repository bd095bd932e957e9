//! Subscription registry: event-kind fan-out to subscriber channels.
//!
//! Owned by the channel task; all mutation goes through `add`/`remove`/
//! `dispatch`, so no interior locking is needed.

use doshii_types::EventKind;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier handed out per `subscribe` call.
pub type SubscriberId = Uuid;

/// A decoded event as delivered to subscribers.
#[derive(Debug, Clone)]
pub struct DoshiiEvent {
    pub kind: EventKind,
    pub payload: Value,
}

struct SubEntry {
    kinds: HashSet<EventKind>,
    tx: mpsc::Sender<DoshiiEvent>,
}

/// Maps event kinds to the set of interested subscribers.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscribers: HashMap<SubscriberId, SubEntry>,
    by_kind: HashMap<EventKind, HashSet<SubscriberId>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for the given kinds. Returns its fresh id.
    pub fn add(&mut self, kinds: &[EventKind], tx: mpsc::Sender<DoshiiEvent>) -> SubscriberId {
        let id = Uuid::new_v4();
        let kind_set: HashSet<EventKind> = kinds.iter().copied().collect();
        for kind in &kind_set {
            self.by_kind.entry(*kind).or_default().insert(id);
        }
        self.subscribers.insert(
            id,
            SubEntry {
                kinds: kind_set,
                tx,
            },
        );
        id
    }

    /// Remove the given kinds from a subscriber; `None` removes all.
    ///
    /// Removing a kind the subscriber does not hold is a no-op. A subscriber
    /// whose kind set becomes empty is removed entirely.
    pub fn remove(&mut self, id: SubscriberId, kinds: Option<&[EventKind]>) {
        let Some(entry) = self.subscribers.get_mut(&id) else {
            return;
        };

        let to_remove: Vec<EventKind> = match kinds {
            Some(kinds) => kinds.to_vec(),
            None => entry.kinds.iter().copied().collect(),
        };

        for kind in to_remove {
            if entry.kinds.remove(&kind) {
                if let Some(ids) = self.by_kind.get_mut(&kind) {
                    ids.remove(&id);
                    if ids.is_empty() {
                        self.by_kind.remove(&kind);
                    }
                }
            }
        }

        if entry.kinds.is_empty() {
            self.subscribers.remove(&id);
        }
    }

    /// Deliver an event to every subscriber currently registered for `kind`.
    ///
    /// Delivery is at-most-once per subscriber; a full or closed subscriber
    /// channel drops that one delivery without affecting the others. A
    /// subscriber whose receiver has been dropped is pruned entirely, so
    /// abandoned subscriptions do not accumulate. Returns the number of
    /// successful deliveries.
    pub fn dispatch(&mut self, kind: EventKind, payload: &Value) -> usize {
        let Some(ids) = self.by_kind.get(&kind) else {
            return 0;
        };

        let mut delivered = 0;
        let mut dead: Vec<SubscriberId> = Vec::new();
        for id in ids {
            let Some(entry) = self.subscribers.get(id) else {
                continue;
            };
            let event = DoshiiEvent {
                kind,
                payload: payload.clone(),
            };
            match entry.tx.try_send(event) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!("Subscriber {id} is lagging, dropping {kind} event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!("Subscriber {id} receiver dropped, pruning");
                    dead.push(*id);
                }
            }
        }

        for id in dead {
            self.remove(id, None);
        }
        delivered
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }
}
