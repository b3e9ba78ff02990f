//! # Runtime events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across five categories:
//! - **Discovery events**: resources registered, repeated attach rejected
//! - **Signal events**: what the hosting environment reported for a resource
//! - **Request events**: outbound load/play/source/rewind requests
//! - **Recovery events**: deferred actions scheduled/fired, stale outcomes, exhaustion
//! - **Bulk events**: lifecycle watcher triggers, restarts, shutdown, subscriber health
//!
//! The [`Event`] struct carries metadata such as timestamps, resource id and label,
//! attempt counters, backoff delays and failure causes.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use mediavisor::{Event, EventKind, FailureKind, ResourceId};
//!
//! let ev = Event::new(EventKind::RetryScheduled)
//!     .with_resource(ResourceId::new(0), "hero")
//!     .with_cause(FailureKind::PlaybackRejected)
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(1000));
//!
//! assert_eq!(ev.kind, EventKind::RetryScheduled);
//! assert_eq!(ev.label.as_deref(), Some("hero"));
//! assert_eq!(ev.delay_ms, Some(1000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::ResourceId;
use crate::error::FailureKind;
use crate::machine::ResourceState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Discovery ===
    /// A resource was discovered and registered.
    ///
    /// Sets: `resource`, `label`, `reason` (`autoplay` or `manual`)
    ResourceRegistered,

    /// A second attach was rejected; discovery runs once per supervisor.
    ///
    /// Sets: `attempt` (number of managed resources)
    AttachRejected,

    // === Signals from the hosting environment ===
    /// Decodable data became available.
    LoadProgress,
    /// Fetch stalled.
    Stalled,
    /// Fetch suspended.
    Suspended,
    /// Playback paused.
    ///
    /// Sets: `reason` (`deliberate` or `unexpected`)
    Paused,
    /// The element reported an error.
    ///
    /// Sets: `reason` (backend error text, if any)
    MediaErrored,
    /// A play request resolved (or the backend reported playback).
    PlayConfirmed,
    /// A play request was rejected.
    ///
    /// Sets: `cause`, `reason`
    PlayRejected,
    /// A signal addressed an id the registry does not know.
    UnknownResource,

    // === Outbound requests ===
    /// Begin-load issued.
    LoadRequested,
    /// Play request issued.
    ///
    /// Sets: `attempt`
    PlayRequested,
    /// Source rewritten with a cache-busting token.
    ///
    /// Sets: `reason` (new source)
    SourceMutated,
    /// Playhead reset to the start.
    Rewound,

    // === Recovery ===
    /// A deferred action was armed.
    ///
    /// Sets: `reason` (action), `delay_ms`, `attempt`, `cause` (for retries/reloads)
    RetryScheduled,
    /// A deferred action fired and was applied.
    ///
    /// Sets: `reason` (action), `attempt`
    DeferredFired,
    /// A timer or play outcome arrived after being superseded and was dropped.
    ///
    /// Sets: `reason` (what was dropped)
    StaleOutcomeDropped,
    /// Retry ceiling reached; the resource is terminally failed.
    ///
    /// Sets: `cause`, `attempt`
    RetryExhausted,
    /// A resource changed state.
    ///
    /// Sets: `state` (new state)
    StateChanged,

    // === Bulk ===
    /// The application became visible again.
    VisibilityRestored,
    /// The page was restored from the history cache.
    HistoryRestored,
    /// Restart-all started.
    ///
    /// Sets: `reason` (`manual` or `lifecycle`), `attempt` (number of resources)
    RestartRequested,
    /// The reaction loop is stopping.
    ShutdownRequested,

    // === Subscriber health ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `label` (subscriber name), `reason` (panic message)
    SubscriberPanicked,
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `label` (subscriber name), `reason`
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Resource the event is about, if any.
    pub resource: Option<ResourceId>,
    /// Resource (or subscriber) label.
    pub label: Option<Arc<str>>,
    /// Attempt counter (or a count, for bulk events).
    pub attempt: Option<u32>,
    /// Scheduled delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Failure classification.
    pub cause: Option<FailureKind>,
    /// Resource state after the event.
    pub state: Option<ResourceState>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            resource: None,
            label: None,
            attempt: None,
            delay_ms: None,
            cause: None,
            state: None,
            reason: None,
        }
    }

    /// Attaches the resource id and its label.
    #[inline]
    pub fn with_resource(mut self, id: ResourceId, label: impl Into<Arc<str>>) -> Self {
        self.resource = Some(id);
        self.label = Some(label.into());
        self
    }

    /// Attaches a label without a resource id.
    #[inline]
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a failure classification.
    #[inline]
    pub fn with_cause(mut self, cause: FailureKind) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Attaches the resource state.
    #[inline]
    pub fn with_state(mut self, state: ResourceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_label(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_label(subscriber)
            .with_reason(info)
    }

    /// Whether the event describes a recovery problem worth surfacing.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::PlayRejected
                | EventKind::MediaErrored
                | EventKind::RetryExhausted
                | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::LoadRequested);
        let b = Event::new(EventKind::LoadRequested);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates_to_u32() {
        let ev = Event::new(EventKind::RetryScheduled).with_delay(Duration::MAX);
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
