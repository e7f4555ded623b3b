use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use crate::domain::TradeEvent;

/// Identity of one downstream subscriber within the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fan-out hub owning the set of live subscriber queues.
///
/// Every mutation (join, leave) and the broadcast traversal run under one
/// mutex, so the collection is never iterated while another task mutates it.
/// Each subscriber gets its own unbounded queue drained by its own forwarding
/// task: a slow consumer grows only its own queue and a dead one is removed
/// lazily when a send fails.
#[derive(Clone, Default)]
pub struct BroadcastHub {
    subscribers: Arc<Mutex<HashMap<SubscriberId, mpsc::UnboundedSender<TradeEvent>>>>,
    next_id: Arc<AtomicU64>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. No backlog: the receiver only sees events
    /// broadcast after this call.
    pub fn join(&self) -> (SubscriberId, mpsc::UnboundedReceiver<TradeEvent>) {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().insert(id, tx);
        tracing::debug!(subscriber = %id, "subscriber joined hub");
        (id, rx)
    }

    /// Remove a subscriber. Removing one that already left is a no-op.
    pub fn leave(&self, id: SubscriberId) {
        if self.subscribers.lock().remove(&id).is_some() {
            tracing::debug!(subscriber = %id, "subscriber left hub");
        }
    }

    /// Deliver one event to every joined subscriber. A failed send (the
    /// subscriber's queue is gone) removes that subscriber and never blocks
    /// or fails delivery to the rest.
    pub fn broadcast(&self, event: &TradeEvent) {
        self.subscribers.lock().retain(|id, tx| {
            if tx.send(event.clone()).is_ok() {
                true
            } else {
                tracing::debug!(subscriber = %id, "dropping subscriber with closed queue");
                false
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Drop every subscriber queue, ending each forwarding task. Used during
    /// shutdown after the upstream connection is closed.
    pub fn close_all(&self) {
        let mut subscribers = self.subscribers.lock();
        let count = subscribers.len();
        subscribers.clear();
        if count > 0 {
            tracing::info!(count, "closed all subscriber queues");
        }
    }
}
