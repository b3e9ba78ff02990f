//! Error types used by the mediavisor runtime and media handles.
//!
//! This module defines three enums:
//!
//! - [`FailureKind`]: classification of a per-resource failure; drives retry policy.
//! - [`MediaError`]: what a [`MediaHandle`](crate::MediaHandle) reports when a request fails.
//! - [`RuntimeError`]: errors raised by the supervisor handle itself.
//!
//! Per-resource failures never reach callers: they are recovered locally and surfaced
//! only through events and the health snapshot.

use thiserror::Error;

/// # Classification of a resource failure.
///
/// Every failure signal is mapped to one of these kinds before the retry policy is
/// consulted. `RetryExhausted` is terminal and only ever reported, never retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Fetch stalled or was suspended before decodable data arrived.
    #[error("transient load failure")]
    TransientLoad,

    /// Play request rejected (autoplay policy) or playback paused without being asked to.
    #[error("playback rejected")]
    PlaybackRejected,

    /// The media element reported an error; the cached asset is likely poisoned.
    #[error("decode failure")]
    DecodeFailure,

    /// Retry ceiling reached; the resource waits for an explicit restart.
    #[error("retries exhausted")]
    RetryExhausted,
}

impl FailureKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mediavisor::FailureKind;
    ///
    /// assert_eq!(FailureKind::DecodeFailure.as_label(), "decode_failure");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureKind::TransientLoad => "transient_load",
            FailureKind::PlaybackRejected => "playback_rejected",
            FailureKind::DecodeFailure => "decode_failure",
            FailureKind::RetryExhausted => "retry_exhausted",
        }
    }

    /// Indicates whether a failure of this kind may be retried automatically.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FailureKind::RetryExhausted)
    }

    /// Whether the retry must rewrite the source reference before reloading.
    pub fn busts_cache(&self) -> bool {
        matches!(self, FailureKind::DecodeFailure)
    }
}

/// # Errors reported by a media handle.
///
/// Mirrors the rejection reasons a browser-like media backend produces for play
/// requests and element errors.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Playback is not allowed without a user gesture.
    #[error("play not allowed: {reason}")]
    NotAllowed { reason: String },

    /// The request was aborted (e.g. superseded by a new load).
    #[error("play aborted")]
    Aborted,

    /// The resource could not be decoded.
    #[error("decode error: {reason}")]
    Decode { reason: String },

    /// The fetch failed at the network layer.
    #[error("network error: {reason}")]
    Network { reason: String },

    /// Anything else.
    #[error("{reason}")]
    Other { reason: String },
}

impl MediaError {
    /// Maps the error onto the failure taxonomy used by the retry policy.
    ///
    /// A rejected play request is a playback failure unless the backend says the
    /// asset itself is broken.
    ///
    /// # Example
    /// ```
    /// use mediavisor::{FailureKind, MediaError};
    ///
    /// let err = MediaError::NotAllowed { reason: "no gesture".into() };
    /// assert_eq!(err.kind(), FailureKind::PlaybackRejected);
    ///
    /// let err = MediaError::Decode { reason: "bad frame".into() };
    /// assert_eq!(err.kind(), FailureKind::DecodeFailure);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            MediaError::Decode { .. } => FailureKind::DecodeFailure,
            MediaError::Network { .. } => FailureKind::TransientLoad,
            MediaError::NotAllowed { .. } | MediaError::Aborted | MediaError::Other { .. } => {
                FailureKind::PlaybackRejected
            }
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            MediaError::NotAllowed { .. } => "media_not_allowed",
            MediaError::Aborted => "media_aborted",
            MediaError::Decode { .. } => "media_decode",
            MediaError::Network { .. } => "media_network",
            MediaError::Other { .. } => "media_other",
        }
    }
}

/// # Errors produced by the supervisor handle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The reaction loop has stopped (supervisor shut down).
    #[error("supervisor is closed")]
    Closed,

    /// Discovery already ran for this supervisor; resources are not re-scanned.
    #[error("document already attached ({managed} resources managed)")]
    AlreadyAttached {
        /// Number of resources registered by the first discovery.
        managed: usize,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mediavisor::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::Closed.as_label(), "runtime_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Closed => "runtime_closed",
            RuntimeError::AlreadyAttached { .. } => "runtime_already_attached",
        }
    }
}
