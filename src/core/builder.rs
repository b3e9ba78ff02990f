use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::{
    core::Config,
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
};
use super::{reactor::Reactor, supervisor::Supervisor, watcher::LifecycleWatcher};

/// Capacity of the reactor's command queue.
const COMMAND_QUEUE: usize = 1024;

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (signals, requests, retries, exhaustion)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the supervisor and starts its tasks.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Event bus for broadcasting
    /// - Subscriber workers and the listener feeding them
    /// - The reaction loop owning the registry
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Supervisor {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let listener = tokio::spawn(subscriber_listener(bus.subscribe(), subs));

        let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
        let reactor = Reactor::new(
            self.cfg.transition_rules(),
            LifecycleWatcher::new(self.cfg.visibility_settle_delay),
            bus.clone(),
            tx.downgrade(),
            rx,
        );
        let reactor = tokio::spawn(reactor.run());

        Supervisor::new_internal(self.cfg, bus, tx, reactor, listener)
    }
}

/// Forwards bus events to the subscriber set until the reactor stops.
async fn subscriber_listener(mut rx: broadcast::Receiver<Event>, set: SubscriberSet) {
    loop {
        match rx.recv().await {
            Ok(ev) => {
                let last = ev.kind == EventKind::ShutdownRequested;
                set.emit(Arc::new(ev));
                if last {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    set.shutdown().await;
}
