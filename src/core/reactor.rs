//! # Reactor: the single reaction loop.
//!
//! The reactor owns the [`Registry`], the [`Scheduler`] and the [`CacheBuster`]. Every
//! input (caller commands, media signals, timer firings, play outcomes) arrives as a
//! [`Command`] on one queue and is processed strictly in arrival order, so the registry
//! needs no locking.
//!
//! ## Flow
//! ```text
//! Command ──► Reactor::handle()
//!               ├─► publish signal event
//!               ├─► transition(lifecycle, input, rules) ──► Transition { next, effects }
//!               ├─► store next lifecycle
//!               └─► perform effects in order:
//!                     Disarm       → scheduler.disarm(resource key)
//!                     Rewind       → handle.rewind()
//!                     MutateSource → handle.set_source(buster.bust(source))
//!                     BeginLoad    → handle.load()
//!                     RequestPlay  → spawn handle.play() ──► Command::PlayOutcome { epoch }
//!                     Arm          → scheduler.arm(job, delay) ──► Command::Timer { ticket }
//!                     Exhausted    → publish RetryExhausted
//! ```
//!
//! ## Rules
//! - Play outcomes carry the epoch they were requested in; outcomes from an older
//!   epoch (a reload or restart happened in between) are dropped.
//! - Timer firings are applied only when their ticket is still current.
//! - The loop ends on [`Command::Shutdown`] or when every sender is gone; pending
//!   timers are cancelled on exit.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::core::registry::{Registry, ResourceHealth, ResourceId};
use crate::core::scheduler::{Job, Scheduler, TimerKey};
use crate::core::watcher::{LifecycleSignal, LifecycleWatcher};
use crate::error::{FailureKind, MediaError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::machine::{Effect, Input, Lifecycle, MediaSignal, ResourceState, TransitionRules, transition};
use crate::media::{CacheBuster, MediaRef};

/// Messages processed by the reaction loop.
pub enum Command {
    /// Register discovered media (runs once).
    Attach {
        media: Vec<MediaRef>,
        reply: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    /// A media signal for one resource.
    Signal { id: ResourceId, signal: MediaSignal },
    /// An application lifecycle signal.
    Lifecycle(LifecycleSignal),
    /// Restart every resource now.
    RestartAll,
    /// Report health of every resource.
    Snapshot(oneshot::Sender<Vec<ResourceHealth>>),
    /// A play request resolved.
    PlayOutcome {
        id: ResourceId,
        epoch: u64,
        result: Result<(), MediaError>,
    },
    /// A scheduled job fired.
    Timer { job: Job, ticket: u64 },
    /// Stop the loop.
    Shutdown,
}

/// Single-owner reaction loop.
pub struct Reactor {
    registry: Registry,
    scheduler: Scheduler,
    watcher: LifecycleWatcher,
    buster: CacheBuster,
    rules: TransitionRules,
    bus: Bus,
    tx: mpsc::WeakSender<Command>,
    rx: mpsc::Receiver<Command>,
}

impl Reactor {
    pub fn new(
        rules: TransitionRules,
        watcher: LifecycleWatcher,
        bus: Bus,
        tx: mpsc::WeakSender<Command>,
        rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            registry: Registry::new(),
            scheduler: Scheduler::new(tx.clone()),
            watcher,
            buster: CacheBuster::new(),
            rules,
            bus,
            tx,
            rx,
        }
    }

    /// Processes commands until shutdown or until every sender is gone.
    ///
    /// Always ends by publishing `ShutdownRequested`; the subscriber listener stops on it.
    pub async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            if !self.handle(cmd) {
                break;
            }
        }
        self.scheduler.cancel_all();
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
    }

    /// Handles one command. Returns `false` when the loop should stop.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Attach { media, reply } => {
                let _ = reply.send(self.attach(media));
            }
            Command::Signal { id, signal } => self.on_signal(id, signal),
            Command::Lifecycle(signal) => self.on_lifecycle(signal),
            Command::RestartAll => self.restart_all("manual"),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.registry.snapshot());
            }
            Command::PlayOutcome { id, epoch, result } => self.on_play_outcome(id, epoch, result),
            Command::Timer { job, ticket } => self.on_timer(job, ticket),
            Command::Shutdown => return false,
        }
        true
    }

    fn attach(&mut self, media: Vec<MediaRef>) -> Result<usize, RuntimeError> {
        if self.registry.is_attached() {
            let managed = self.registry.len();
            self.bus.publish(
                Event::new(EventKind::AttachRejected)
                    .with_attempt(u32::try_from(managed).unwrap_or(u32::MAX)),
            );
            return Err(RuntimeError::AlreadyAttached { managed });
        }

        let ids = self.registry.attach(media);
        for &id in &ids {
            if let Some(res) = self.registry.get(id) {
                let mode = if res.lifecycle.autoplay { "autoplay" } else { "manual" };
                self.bus.publish(
                    Event::new(EventKind::ResourceRegistered)
                        .with_resource(id, res.label())
                        .with_reason(mode),
                );
            }
            self.apply(id, Input::Register);
        }
        Ok(ids.len())
    }

    fn on_signal(&mut self, id: ResourceId, signal: MediaSignal) {
        let Some(res) = self.registry.get(id) else {
            self.bus.publish(
                Event::new(EventKind::UnknownResource)
                    .with_reason(format!("{id} {}", signal.as_label())),
            );
            return;
        };

        let ev = |kind| Event::new(kind).with_resource(id, res.label());
        let (event, input) = match signal {
            MediaSignal::LoadProgress => (ev(EventKind::LoadProgress), Input::LoadProgress),
            MediaSignal::Stalled => (ev(EventKind::Stalled), Input::Stalled),
            MediaSignal::Suspended => (ev(EventKind::Suspended), Input::Suspended),
            MediaSignal::Paused => {
                let deliberate = res.handle.paused_deliberately();
                let kind = if deliberate { "deliberate" } else { "unexpected" };
                (ev(EventKind::Paused).with_reason(kind), Input::Paused { deliberate })
            }
            MediaSignal::Errored => {
                let mut e = ev(EventKind::MediaErrored).with_cause(FailureKind::DecodeFailure);
                if let Some(msg) = res.handle.last_error() {
                    e = e.with_reason(msg);
                }
                (e, Input::DecodeError)
            }
            MediaSignal::Playing => (ev(EventKind::PlayConfirmed), Input::PlayConfirmed),
        };
        self.bus.publish(event);
        self.apply(id, input);
    }

    fn on_lifecycle(&mut self, signal: LifecycleSignal) {
        if let Some(kind) = self.watcher.react(signal) {
            self.bus.publish(Event::new(kind).with_delay(self.watcher.settle()));
            self.scheduler.arm(Job::SettleRestart, self.watcher.settle());
        }
    }

    fn on_play_outcome(&mut self, id: ResourceId, epoch: u64, result: Result<(), MediaError>) {
        let Some(res) = self.registry.get(id) else {
            return;
        };
        if epoch != res.lifecycle.epoch {
            self.bus.publish(
                Event::new(EventKind::StaleOutcomeDropped)
                    .with_resource(id, res.label())
                    .with_reason("play_outcome"),
            );
            return;
        }

        let input = match result {
            Ok(()) => {
                self.bus
                    .publish(Event::new(EventKind::PlayConfirmed).with_resource(id, res.label()));
                Input::PlayConfirmed
            }
            Err(err) => {
                let kind = err.kind();
                self.bus.publish(
                    Event::new(EventKind::PlayRejected)
                        .with_resource(id, res.label())
                        .with_cause(kind)
                        .with_reason(err.to_string()),
                );
                Input::PlayRejected { kind }
            }
        };
        self.apply(id, input);
    }

    fn on_timer(&mut self, job: Job, ticket: u64) {
        if !self.scheduler.complete(job.key(), ticket) {
            let mut ev = Event::new(EventKind::StaleOutcomeDropped).with_reason("timer");
            if let Job::Deferred(id, _) = job {
                if let Some(res) = self.registry.get(id) {
                    ev = ev.with_resource(id, res.label());
                }
            }
            self.bus.publish(ev);
            return;
        }

        match job {
            Job::Deferred(id, action) => {
                let Some(res) = self.registry.get(id) else {
                    return;
                };
                let ready = res.handle.ready_state();
                self.bus.publish(
                    Event::new(EventKind::DeferredFired)
                        .with_resource(id, res.label())
                        .with_reason(action.as_label())
                        .with_attempt(res.lifecycle.attempts),
                );
                self.apply(id, Input::Fired { action, ready });
            }
            Job::SettleRestart => self.restart_all("lifecycle"),
        }
    }

    fn restart_all(&mut self, reason: &'static str) {
        let ids = self.registry.ids();
        self.bus.publish(
            Event::new(EventKind::RestartRequested)
                .with_reason(reason)
                .with_attempt(u32::try_from(ids.len()).unwrap_or(u32::MAX)),
        );
        for id in ids {
            self.apply(id, Input::Restart);
        }
    }

    /// Runs one input through the state machine and performs the resulting effects.
    fn apply(&mut self, id: ResourceId, input: Input) {
        let Some(res) = self.registry.get_mut(id) else {
            return;
        };
        let prev = res.lifecycle.state;
        let t = transition(&res.lifecycle, input, &self.rules);
        res.lifecycle = t.next.clone();
        let handle = Arc::clone(&res.handle);

        for effect in t.effects {
            self.perform(id, &handle, &t.next, effect);
        }
        if t.next.state != prev {
            self.bus.publish(
                Event::new(EventKind::StateChanged)
                    .with_resource(id, handle.label())
                    .with_state(t.next.state)
                    .with_attempt(t.next.attempts),
            );
        }
    }

    fn perform(&mut self, id: ResourceId, handle: &MediaRef, lc: &Lifecycle, effect: Effect) {
        let ev = |kind| Event::new(kind).with_resource(id, handle.label());
        match effect {
            Effect::Disarm => {
                self.scheduler.disarm(TimerKey::Resource(id));
            }
            Effect::Rewind => {
                handle.rewind();
                self.bus.publish(ev(EventKind::Rewound));
            }
            Effect::MutateSource => {
                if let Some(src) = handle.source() {
                    let fresh = self.buster.bust(&src);
                    handle.set_source(fresh.clone());
                    self.bus.publish(ev(EventKind::SourceMutated).with_reason(fresh));
                }
            }
            Effect::BeginLoad => {
                handle.load();
                self.bus.publish(ev(EventKind::LoadRequested));
            }
            Effect::RequestPlay => {
                self.bus
                    .publish(ev(EventKind::PlayRequested).with_attempt(lc.attempts));
                self.spawn_play(id, Arc::clone(handle), lc.epoch);
            }
            Effect::Arm { action, delay } => {
                self.scheduler.arm(Job::Deferred(id, action), delay);
                let mut e = ev(EventKind::RetryScheduled)
                    .with_reason(action.as_label())
                    .with_delay(delay)
                    .with_attempt(lc.attempts);
                if let Some(cause) = armed_cause(lc.state) {
                    e = e.with_cause(cause);
                }
                self.bus.publish(e);
            }
            Effect::Exhausted { cause } => {
                self.bus.publish(
                    ev(EventKind::RetryExhausted)
                        .with_cause(cause)
                        .with_attempt(lc.attempts),
                );
            }
        }
    }

    /// Issues `play()` off the loop; the outcome comes back as a command.
    fn spawn_play(&self, id: ResourceId, handle: MediaRef, epoch: u64) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let result = handle.play().await;
            let _ = tx.send(Command::PlayOutcome { id, epoch, result }).await;
        });
    }
}

/// Failure an armed state recovers from (none for a plain stall recheck).
fn armed_cause(state: ResourceState) -> Option<FailureKind> {
    match state {
        ResourceState::Retrying { cause } => Some(cause),
        ResourceState::Suspended => Some(FailureKind::TransientLoad),
        ResourceState::PausedUnexpected => Some(FailureKind::PlaybackRejected),
        _ => None,
    }
}
