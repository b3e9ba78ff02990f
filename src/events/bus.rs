//! # Event bus.
//!
//! [`Bus`] carries every [`Event`] the reactor and the subscriber workers publish.
//! It wraps [`tokio::sync::broadcast`], so publishing never waits on a consumer.
//!
//! ```text
//! reactor ──────────┐                 ┌──► subscriber listener ──► SubscriberSet
//!                   ├──► Bus ─────────┤
//! subscriber workers┘  (ring buffer)  └──► Supervisor::subscribe() receivers
//! ```
//!
//! ## Rules
//! - One ring buffer of `capacity` events is shared by all receivers.
//! - A receiver sees only events published after it subscribed.
//! - A receiver that falls more than `capacity` events behind gets
//!   `RecvError::Lagged(n)` and resumes at the oldest retained event.
//! - With no receivers the event is dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable publish/subscribe handle for runtime events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes `ev` to every current receiver without waiting.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Returns an independent receiver for subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receiver_sees_only_later_events() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::LoadRequested));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::PlayRequested));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::PlayRequested);
    }

    #[tokio::test]
    async fn test_slow_receiver_lags() {
        let bus = Bus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..4 {
            bus.publish(Event::new(EventKind::Stalled));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
    }
}
