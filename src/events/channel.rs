//! Best-effort broadcast of change events between open displays.
//!
//! Delivery is at-most-once and unordered across publishers. A context that
//! subscribes after a publish misses the event; a subscriber that falls
//! behind the channel capacity loses the oldest events. Both are fine:
//! every event is only an invalidation hint, and the store is re-readable
//! ground truth.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use super::models::ChangeEvent;
use crate::constants::BROADCAST_CHANNEL_CAPACITY;

/// Publisher handle for the session-local notification channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Create a channel with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CHANNEL_CAPACITY)
    }

    /// Create a channel with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to every open subscriber.
    ///
    /// Never blocks and never fails: with no subscriber the event is simply
    /// dropped, since there is no context to invalidate.
    pub fn publish(&self, event: ChangeEvent) {
        log::debug!(
            "publishing {} for {} record(s)",
            event.kind,
            event.affected.len()
        );
        if self.sender.send(event).is_err() {
            log::debug!("no open contexts to notify");
        }
    }

    /// Open a subscription. Only events published from now on are seen.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
            missed: 0,
        }
    }

    /// Number of currently open subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of the notification channel.
pub struct EventSubscriber {
    receiver: broadcast::Receiver<ChangeEvent>,
    missed: u64,
}

impl EventSubscriber {
    /// Collect every event currently pending, without blocking.
    ///
    /// Lagged events are counted as missed and skipped; after a lag the
    /// subscriber should re-read the store rather than rely on the events
    /// it did receive.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(count)) => {
                    self.missed += count;
                    log::warn!("notification channel lagged, {count} event(s) dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }

    /// Total events this subscriber has provably missed.
    pub fn missed(&self) -> u64 {
        self.missed
    }
}
