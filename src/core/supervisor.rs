//! # Supervisor: public handle to the reaction loop.
//!
//! The [`Supervisor`] owns the command queue into the reactor, the event [`Bus`] and
//! the tasks started by the [`SupervisorBuilder`]. All methods only enqueue a command
//! (and, for queries, await the reply); no resource state lives in the handle.
//!
//! ## High-level architecture
//! ```text
//! Host environment                      Supervisor                  Reactor task
//!   attach(document)        ──► Command::Attach ─────────────►  registry.attach()
//!   notify(id, signal)      ──► Command::Signal ─────────────►  transition() + effects
//!   visibility/page shown   ──► Command::Lifecycle ──────────►  settle timer ──► restart all
//!   restart_all()           ──► Command::RestartAll ─────────►  transition(Restart) per resource
//!   health_snapshot()       ──► Command::Snapshot ◄── reply ──  registry.snapshot()
//!
//! Reactor ── publish(Event) ──► Bus ──► listener ──► SubscriberSet ──► workers
//!                                   └──► subscribe() receivers
//! ```
//!
//! ## Rules
//! - Per-resource failures never surface here; they are visible in events and the
//!   health snapshot only.
//! - `restart_all` and `health_snapshot` are safe before discovery (no-op / empty).
//! - After shutdown, commands return [`RuntimeError::Closed`] and snapshots are empty.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use mediavisor::{Config, LogWriter, MediaSignal, ResourceId, StaticDocument, Supervisor};
//!
//! # async fn demo(doc: StaticDocument) -> Result<(), mediavisor::RuntimeError> {
//! let sup = Supervisor::builder(Config::default())
//!     .with_subscribers(vec![Arc::new(LogWriter::new())])
//!     .build();
//!
//! let managed = sup.attach(&doc).await?;
//! if managed > 0 {
//!     sup.notify(ResourceId::new(0), MediaSignal::LoadProgress).await?;
//! }
//! for health in sup.health_snapshot().await {
//!     println!("{} {} attempts={}", health.label, health.state, health.attempts);
//! }
//! sup.shutdown().await;
//! # Ok(())
//! # }
//! ```

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::{
    builder::SupervisorBuilder,
    config::Config,
    reactor::Command,
    registry::{ResourceHealth, ResourceId},
    watcher::LifecycleSignal,
};
use crate::{
    error::RuntimeError,
    events::{Bus, Event},
    machine::MediaSignal,
    media::Document,
};

/// Handle to a running media supervisor.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    tx: mpsc::Sender<Command>,
    reactor: JoinHandle<()>,
    listener: JoinHandle<()>,
}

impl Supervisor {
    /// Creates a builder for configuring the supervisor.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        tx: mpsc::Sender<Command>,
        reactor: JoinHandle<()>,
        listener: JoinHandle<()>,
    ) -> Self {
        Self {
            cfg,
            bus,
            tx,
            reactor,
            listener,
        }
    }

    /// Configuration this supervisor was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Scans `doc` once and registers every playable resource in document order.
    ///
    /// Registration issues begin-load for every resource, and a play request for
    /// autoplay ones. Returns the number of resources now managed.
    ///
    /// # Errors
    /// - [`RuntimeError::AlreadyAttached`] if discovery already ran.
    /// - [`RuntimeError::Closed`] if the supervisor was shut down.
    pub async fn attach(&self, doc: &dyn Document) -> Result<usize, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Attach {
            media: doc.media(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::Closed)?
    }

    /// Delivers a media signal for resource `id`.
    ///
    /// Signals for unknown ids are reported as `UnknownResource` events, not errors.
    pub async fn notify(&self, id: ResourceId, signal: MediaSignal) -> Result<(), RuntimeError> {
        self.send(Command::Signal { id, signal }).await
    }

    /// Delivers an application lifecycle signal to the watcher.
    pub async fn lifecycle(&self, signal: LifecycleSignal) -> Result<(), RuntimeError> {
        self.send(Command::Lifecycle(signal)).await
    }

    /// Shorthand for [`LifecycleSignal::VisibilityChanged`].
    pub async fn visibility_changed(&self, hidden: bool) -> Result<(), RuntimeError> {
        self.lifecycle(LifecycleSignal::VisibilityChanged { hidden }).await
    }

    /// Shorthand for [`LifecycleSignal::PageShown`].
    pub async fn page_shown(&self, persisted: bool) -> Result<(), RuntimeError> {
        self.lifecycle(LifecycleSignal::PageShown { persisted }).await
    }

    /// Resets every resource: attempts to 0, rewind, re-issue load (and play for
    /// autoplay resources), regardless of state. Pending deferred actions are cancelled.
    ///
    /// No-op on an empty registry or a closed supervisor.
    pub async fn restart_all(&self) {
        let _ = self.send(Command::RestartAll).await;
    }

    /// Health of every managed resource, in discovery order.
    ///
    /// Empty before discovery and after shutdown.
    pub async fn health_snapshot(&self) -> Vec<ResourceHealth> {
        let (reply, rx) = oneshot::channel();
        if self.send(Command::Snapshot(reply)).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    /// Returns a receiver observing every subsequent event.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Stops the reaction loop, cancels pending timers and drains subscribers.
    pub async fn shutdown(self) {
        let _ = self.tx.send(Command::Shutdown).await;
        let _ = self.reactor.await;
        let _ = self.listener.await;
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.tx.send(cmd).await.map_err(|_| RuntimeError::Closed)
    }
}
