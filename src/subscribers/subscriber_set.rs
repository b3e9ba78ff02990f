//! # Non-blocking event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] hands every event to each interested subscriber's bounded queue
//! and returns immediately; a dedicated worker per subscriber drains the queue.
//!
//! ```text
//! emit(event)
//!     ├──► wants(kind)? ──► [queue 1] ──► worker 1 ──► on_event()
//!     │                                       └──────► panic → SubscriberPanicked
//!     └──► wants(kind)? ──► [queue N] ──► worker N ──► on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**; no ordering across subscribers.
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow` published
//!   (never for an overflow event itself, to avoid feedback loops).
//! - **Isolation**: a panicking subscriber is reported and keeps receiving events.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

struct Lane {
    sub: Arc<dyn Subscribe>,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for event subscribers.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker per subscriber.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut lanes = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            workers.push(tokio::spawn(drain(Arc::clone(&sub), rx, bus.clone())));
            lanes.push(Lane { sub, sender: tx });
        }
        Self {
            lanes,
            workers,
            bus,
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Whether the set has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Delivers an event to every interested subscriber without waiting.
    pub fn emit(&self, event: Arc<Event>) {
        let is_overflow_evt = event.kind == EventKind::SubscriberOverflow;

        for lane in &self.lanes {
            if !lane.sub.wants(event.kind) {
                continue;
            }
            let reason = match lane.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow_evt {
                self.bus
                    .publish(Event::subscriber_overflow(lane.sub.name(), reason));
            }
        }
    }

    /// Closes every queue and waits for the workers to drain.
    pub async fn shutdown(self) {
        drop(self.lanes);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

async fn drain(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let fut = sub.on_event(ev.as_ref());
        if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            let any = &*panic;
            let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = any.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            bus.publish(Event::subscriber_panicked(sub.name(), info));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
        only: Option<EventKind>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }
        fn wants(&self, kind: EventKind) -> bool {
            self.only.is_none_or(|k| k == kind)
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }
        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[tokio::test]
    async fn test_filtered_delivery_in_order() {
        let bus = Bus::new(16);
        let all = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            only: None,
        });
        let some = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            only: Some(EventKind::RetryExhausted),
        });
        let subs: Vec<Arc<dyn Subscribe>> = vec![all.clone(), some.clone()];
        let set = SubscriberSet::new(subs, bus);

        set.emit(Arc::new(Event::new(EventKind::LoadRequested)));
        set.emit(Arc::new(Event::new(EventKind::RetryExhausted)));
        set.shutdown().await;

        assert_eq!(
            *all.seen.lock().unwrap(),
            vec![EventKind::LoadRequested, EventKind::RetryExhausted]
        );
        assert_eq!(*some.seen.lock().unwrap(), vec![EventKind::RetryExhausted]);
    }

    #[tokio::test]
    async fn test_panic_is_reported_on_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Panicker)];
        let set = SubscriberSet::new(subs, bus);

        set.emit(Arc::new(Event::new(EventKind::LoadRequested)));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.label.as_deref(), Some("panicker"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        set.shutdown().await;
    }
}
