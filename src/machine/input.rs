//! Inputs to and outputs of the state machine.

use std::time::Duration;

use crate::error::FailureKind;
use crate::media::ReadyState;

/// Signals the hosting environment delivers for one resource.
///
/// These are the raw media-element notifications; the reactor enriches them with
/// probes from the handle before they reach the machine as an [`Input`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaSignal {
    /// Decodable data became available.
    LoadProgress,
    /// The fetch stopped making progress.
    Stalled,
    /// The backend abandoned fetching.
    Suspended,
    /// Playback paused.
    Paused,
    /// The element reported an error.
    Errored,
    /// Playback started (backend play event).
    Playing,
}

impl MediaSignal {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            MediaSignal::LoadProgress => "load_progress",
            MediaSignal::Stalled => "stalled",
            MediaSignal::Suspended => "suspended",
            MediaSignal::Paused => "paused",
            MediaSignal::Errored => "errored",
            MediaSignal::Playing => "playing",
        }
    }
}

/// Work deferred behind a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// Check readiness after a stall; reload if still below threshold.
    StallRecheck,
    /// Re-issue the load after a suspend.
    Reload,
    /// Re-issue load (+play) after a failure.
    Retry,
}

impl Deferred {
    pub fn as_label(&self) -> &'static str {
        match self {
            Deferred::StallRecheck => "stall_recheck",
            Deferred::Reload => "reload",
            Deferred::Retry => "retry",
        }
    }
}

/// One input to [`transition`](crate::machine::transition).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Discovery registered the resource.
    Register,
    /// Decodable data became available.
    LoadProgress,
    /// Fetch stalled.
    Stalled,
    /// Fetch suspended.
    Suspended,
    /// Playback paused; `deliberate` is the handle's own classification.
    Paused { deliberate: bool },
    /// The element reported an error.
    DecodeError,
    /// A play request resolved successfully (or the backend reported playback).
    PlayConfirmed,
    /// A play request was rejected; `kind` classifies the rejection.
    PlayRejected { kind: FailureKind },
    /// A deferred action fired; `ready` is the readiness probed at fire time.
    Fired { action: Deferred, ready: ReadyState },
    /// Explicit restart.
    Restart,
}

/// Side effect requested by a transition, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the pending deferred action, if any.
    Disarm,
    /// Seek to the start.
    Rewind,
    /// Rewrite the source with a cache-busting token.
    MutateSource,
    /// Issue begin-load.
    BeginLoad,
    /// Issue an async play request.
    RequestPlay,
    /// Arm a deferred action (replaces any pending one).
    Arm { action: Deferred, delay: Duration },
    /// The retry ceiling was reached.
    Exhausted { cause: FailureKind },
}
