//! # Media handle abstraction.
//!
//! [`MediaHandle`] is the injected seam between the supervisor and a real (or fake)
//! media backend. The supervisor owns only the load/play lifecycle; rendering and
//! buffering stay with the backend.
//!
//! Requests are split by how their outcome arrives:
//! - `load`, `rewind`, `set_source` are fire-and-forget; progress comes back later as
//!   signals delivered through [`Supervisor::notify`](crate::Supervisor::notify).
//! - `play` is async and resolves to success or a [`MediaError`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MediaError;

/// Readiness level of a media resource (HTML `readyState` semantics).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ReadyState {
    /// No information about the resource is available.
    #[default]
    HaveNothing = 0,
    /// Duration and dimensions are known.
    HaveMetadata = 1,
    /// Data for the current playback position is available.
    HaveCurrentData = 2,
    /// Data for at least a little ahead of the current position is available.
    HaveFutureData = 3,
    /// Enough data is available to play through without stalling.
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Minimal readiness a stalled resource must reach to avoid a reload.
    pub const STALL_THRESHOLD: ReadyState = ReadyState::HaveCurrentData;

    /// Raw numeric level.
    #[inline]
    pub fn as_raw(self) -> u8 {
        self as u8
    }

    /// Converts a raw level; values above 4 saturate to [`ReadyState::HaveEnoughData`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ReadyState::HaveNothing,
            1 => ReadyState::HaveMetadata,
            2 => ReadyState::HaveCurrentData,
            3 => ReadyState::HaveFutureData,
            _ => ReadyState::HaveEnoughData,
        }
    }

    /// Whether the resource has advanced past the stall threshold.
    #[inline]
    pub fn has_current_data(self) -> bool {
        self >= Self::STALL_THRESHOLD
    }
}

/// Network activity of a media resource (HTML `networkState` semantics).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NetworkState {
    /// Not yet initialized.
    #[default]
    Empty = 0,
    /// Source selected but not fetching.
    Idle = 1,
    /// Actively fetching.
    Loading = 2,
    /// No usable source found.
    NoSource = 3,
}

impl NetworkState {
    /// Raw numeric state.
    #[inline]
    pub fn as_raw(self) -> u8 {
        self as u8
    }
}

/// # One playable media resource.
///
/// Implementations must be cheap to probe: `ready_state`, `is_paused` and friends are
/// read from the reaction loop and the health snapshot.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use mediavisor::{MediaError, MediaHandle, NetworkState, ReadyState};
///
/// struct Silent;
///
/// #[async_trait]
/// impl MediaHandle for Silent {
///     fn label(&self) -> &str { "silent" }
///     fn autoplay(&self) -> bool { false }
///     fn load(&self) {}
///     async fn play(&self) -> Result<(), MediaError> { Ok(()) }
///     fn rewind(&self) {}
///     fn paused_deliberately(&self) -> bool { true }
///     fn is_paused(&self) -> bool { true }
///     fn ready_state(&self) -> ReadyState { ReadyState::HaveNothing }
///     fn network_state(&self) -> NetworkState { NetworkState::Empty }
///     fn last_error(&self) -> Option<String> { None }
///     fn source(&self) -> Option<String> { None }
///     fn set_source(&self, _src: String) {}
/// }
/// ```
#[async_trait]
pub trait MediaHandle: Send + Sync + 'static {
    /// Human-readable name (for events/logs).
    fn label(&self) -> &str;

    /// Whether the resource is expected to play without user action.
    ///
    /// Read once at registration.
    fn autoplay(&self) -> bool;

    /// Begins (or restarts) fetching the resource.
    fn load(&self);

    /// Requests playback; resolves once the backend accepts or rejects it.
    async fn play(&self) -> Result<(), MediaError>;

    /// Seeks back to the start.
    fn rewind(&self);

    /// Whether the current paused state was requested by the user or the page.
    ///
    /// Used to tell an unrequested pause (retried) from a deliberate one (ignored).
    fn paused_deliberately(&self) -> bool;

    /// Raw paused flag.
    fn is_paused(&self) -> bool;

    /// Current readiness level.
    fn ready_state(&self) -> ReadyState;

    /// Current network activity.
    fn network_state(&self) -> NetworkState;

    /// Last error reported by the backend, if any.
    fn last_error(&self) -> Option<String>;

    /// Current source reference, if the resource has an explicit one.
    fn source(&self) -> Option<String>;

    /// Replaces the source reference.
    fn set_source(&self, src: String);
}

/// Shared reference to a media handle.
pub type MediaRef = Arc<dyn MediaHandle>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_round_trip_and_saturation() {
        assert_eq!(ReadyState::from_raw(2), ReadyState::HaveCurrentData);
        assert_eq!(ReadyState::from_raw(9), ReadyState::HaveEnoughData);
        assert_eq!(ReadyState::HaveFutureData.as_raw(), 3);
    }

    #[test]
    fn test_stall_threshold() {
        assert!(!ReadyState::HaveMetadata.has_current_data());
        assert!(ReadyState::HaveCurrentData.has_current_data());
        assert!(ReadyState::HaveEnoughData.has_current_data());
    }
}
