//! # Per-resource lifecycle data.

use std::fmt;

use crate::error::FailureKind;

/// Explicit lifecycle state of one managed resource.
///
/// Armed states (`StallPending`, `Suspended`, `PausedUnexpected`, `Retrying`) own exactly
/// one pending deferred action in the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Discovered, nothing requested yet.
    Idle,
    /// Load requested; no decodable data confirmed.
    Loading,
    /// Decodable data available; not playing.
    Loaded,
    /// Fetch stalled; a readiness recheck is armed.
    StallPending,
    /// Fetch abandoned before data arrived; a reload is armed.
    Suspended,
    /// Play request confirmed.
    Playing,
    /// Autoplay resource paused without being asked to; a retry is armed.
    PausedUnexpected,
    /// A failure consumed an attempt; a retry is armed.
    Retrying {
        /// What the armed retry recovers from.
        cause: FailureKind,
    },
    /// Retry ceiling reached; waits for an explicit restart.
    Failed,
}

impl ResourceState {
    /// Whether a deferred action is pending for this state.
    pub fn is_armed(&self) -> bool {
        matches!(
            self,
            ResourceState::StallPending
                | ResourceState::Suspended
                | ResourceState::PausedUnexpected
                | ResourceState::Retrying { .. }
        )
    }

    /// Whether an armed retry (not a recheck or reload) is pending.
    pub fn has_armed_retry(&self) -> bool {
        matches!(
            self,
            ResourceState::PausedUnexpected | ResourceState::Retrying { .. }
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResourceState::Idle => "idle",
            ResourceState::Loading => "loading",
            ResourceState::Loaded => "loaded",
            ResourceState::StallPending => "stall_pending",
            ResourceState::Suspended => "suspended",
            ResourceState::Playing => "playing",
            ResourceState::PausedUnexpected => "paused_unexpected",
            ResourceState::Retrying { .. } => "retrying",
            ResourceState::Failed => "failed",
        }
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Retrying { cause } => write!(f, "retrying({})", cause.as_label()),
            other => f.write_str(other.as_label()),
        }
    }
}

/// Lifecycle facts of one managed resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    /// Current explicit state.
    pub state: ResourceState,
    /// At least one decodable frame has been delivered.
    pub loaded: bool,
    /// Last play request (or play event) confirmed and not paused/failed since.
    pub playing: bool,
    /// Consecutive attempts consumed since the last confirmed play.
    pub attempts: u32,
    /// Fixed at registration.
    pub autoplay: bool,
    /// Bumped by every load request; play outcomes from an older epoch are stale.
    pub epoch: u64,
}

impl Lifecycle {
    /// A freshly discovered resource.
    pub fn new(autoplay: bool) -> Self {
        Self {
            state: ResourceState::Idle,
            loaded: false,
            playing: false,
            attempts: 0,
            autoplay,
            epoch: 0,
        }
    }

    /// The resting state implied by the current facts.
    pub(crate) fn settled(&self) -> ResourceState {
        if self.playing {
            ResourceState::Playing
        } else if self.loaded {
            ResourceState::Loaded
        } else {
            ResourceState::Loading
        }
    }

    /// Whether the resource is terminally failed.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.state == ResourceState::Failed
    }
}
