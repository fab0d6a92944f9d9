//! Asynchronous, multi-subscriber, lossy event bus.
//!
//! The core only publishes; it never subscribes. Subscribers that fall
//! behind drop events (via `tokio::sync::broadcast`'s lagged-receiver
//! semantics) rather than applying back-pressure to admission.

use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A tx was admitted into the Container.
    MempoolTxAdded { hash: String },
    /// A tx left the Container, either by explicit removal or block commit.
    MempoolTxRemoved { hash: String },
    /// A tx failed validation or admission.
    MempoolTxRejected { hash: String, reason: String },
    /// A committed tx's ABCI response code was zero.
    MempoolTxCommitted { hash: String },
    /// A tx admitted via cache drain should now be gossiped.
    MempoolBroadcastTx { hash: String },
}

/// Thin wrapper around a broadcast sender. Cloning shares the same channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Publish an event. Errors (no subscribers) are swallowed — publishing
    /// must never fail admission.
    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
