//! In-process notification bus.
//!
//! Thin wrapper over [`tokio::sync::broadcast`]: publishers never block and
//! never fail, subscribers that fall behind lose the oldest events.

use tokio::sync::broadcast;

pub use broadcast::error::RecvError;
pub use broadcast::Receiver;

/// Default per-subscriber buffer.
pub const DEFAULT_CAPACITY: usize = 256;

/// Broadcast channel for one event type.
#[derive(Debug)]
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone + Send + 'static> EventBus<E> {
    /// Create a bus buffering up to `capacity` events per subscriber.
    ///
    /// A zero capacity is bumped to 1 since broadcast channels reject it.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event, returning how many subscribers will see it.
    pub fn publish(&self, event: E) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            Err(_) => {
                tracing::trace!("event dropped, no subscribers attached");
                0
            }
        }
    }

    pub fn subscribe(&self) -> Receiver<E> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E: Clone + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
