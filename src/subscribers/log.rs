//! # LogWriter: structured event logging
//!
//! A subscriber that forwards supervisor events to [`tracing`]. Progress goes to
//! `debug!`/`info!`, transient failures to `warn!`, exhaustion and subscriber panics
//! to `error!`. Install any `tracing` subscriber (e.g. `tracing-subscriber` with an
//! `EnvFilter`) to see the output.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO  mediavisor: registered resource=0 label="hero" mode="autoplay"
//! WARN  mediavisor: play rejected resource=0 label="hero" cause="playback_rejected"
//! INFO  mediavisor: retry scheduled resource=0 action="retry" delay_ms=500 attempt=1
//! ERROR mediavisor: retries exhausted resource=0 label="hero" attempt=3
//! INFO  mediavisor: restart requested reason="lifecycle" resources=2
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

const TARGET: &str = "mediavisor";

/// Tracing-backed event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let id = e.resource.map(|r| r.index());
        let label = e.label.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        let cause = e.cause.map(|c| c.as_label());

        match e.kind {
            EventKind::ResourceRegistered => {
                info!(target: TARGET, resource = ?id, label, mode = reason, "registered");
            }
            EventKind::AttachRejected => {
                warn!(target: TARGET, managed = ?e.attempt, "attach rejected: already discovered");
            }
            EventKind::LoadProgress => {
                info!(target: TARGET, resource = ?id, label, "loaded");
            }
            EventKind::Stalled => {
                warn!(target: TARGET, resource = ?id, label, "stalled");
            }
            EventKind::Suspended => {
                warn!(target: TARGET, resource = ?id, label, "suspended");
            }
            EventKind::Paused => {
                debug!(target: TARGET, resource = ?id, label, kind = reason, "paused");
            }
            EventKind::MediaErrored => {
                error!(target: TARGET, resource = ?id, label, error = reason, "media error");
            }
            EventKind::PlayConfirmed => {
                info!(target: TARGET, resource = ?id, label, "playing");
            }
            EventKind::PlayRejected => {
                warn!(target: TARGET, resource = ?id, label, cause, error = reason, "play rejected");
            }
            EventKind::UnknownResource => {
                warn!(target: TARGET, resource = ?id, signal = reason, "signal for unknown resource");
            }
            EventKind::LoadRequested | EventKind::Rewound => {
                debug!(target: TARGET, resource = ?id, label, kind = ?e.kind, "request");
            }
            EventKind::PlayRequested => {
                debug!(target: TARGET, resource = ?id, label, attempt = ?e.attempt, "play requested");
            }
            EventKind::SourceMutated => {
                info!(target: TARGET, resource = ?id, label, source = reason, "source cache-busted");
            }
            EventKind::RetryScheduled => {
                info!(
                    target: TARGET,
                    resource = ?id,
                    label,
                    action = reason,
                    delay_ms = ?e.delay_ms,
                    attempt = ?e.attempt,
                    cause,
                    "retry scheduled"
                );
            }
            EventKind::DeferredFired => {
                debug!(target: TARGET, resource = ?id, label, action = reason, "deferred fired");
            }
            EventKind::StaleOutcomeDropped => {
                debug!(target: TARGET, resource = ?id, label, what = reason, "stale outcome dropped");
            }
            EventKind::RetryExhausted => {
                error!(target: TARGET, resource = ?id, label, cause, attempt = ?e.attempt, "retries exhausted");
            }
            EventKind::StateChanged => {
                debug!(
                    target: TARGET,
                    resource = ?id,
                    label,
                    state = %e.state.map(|s| s.to_string()).unwrap_or_default(),
                    "state changed"
                );
            }
            EventKind::VisibilityRestored => {
                info!(target: TARGET, "visibility restored");
            }
            EventKind::HistoryRestored => {
                info!(target: TARGET, "restored from history cache");
            }
            EventKind::RestartRequested => {
                info!(target: TARGET, reason, resources = ?e.attempt, "restart requested");
            }
            EventKind::ShutdownRequested => {
                info!(target: TARGET, "shutdown requested");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: TARGET, subscriber = label, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                error!(target: TARGET, subscriber = label, info = reason, "subscriber panicked");
            }
        }
    }

    fn wants(&self, kind: EventKind) -> bool {
        // Overflow of this writer would only log about itself.
        kind != EventKind::SubscriberOverflow
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
