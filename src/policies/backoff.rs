//! # Backoff policy for resource retries.
//!
//! [`BackoffPolicy`] controls how the delay before a retry grows with the number of
//! consecutive attempts. Growth is **linear**: the delay for attempt `n` is
//! `base × n`. There is no time ceiling; the retry ceiling of
//! [`RetryPolicy`](crate::RetryPolicy) bounds it implicitly.
//!
//! Jitter is applied to the linear base, and the jittered value never feeds back into
//! later calculations; each attempt derives its base from the attempt number alone.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use mediavisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     base: Duration::from_millis(500),
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay(1), Duration::from_millis(500));
//! assert_eq!(backoff.delay(2), Duration::from_millis(1000));
//! assert_eq!(backoff.delay(3), Duration::from_millis(1500));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Linear retry backoff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay unit; attempt `n` waits `base × n`.
    pub base: Duration,
    /// Jitter policy applied on top of the linear delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns `base = 500ms`, no jitter.
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay before the retry numbered `attempts` (1-based).
    ///
    /// # Notes
    /// - `attempts = 0` yields `Duration::ZERO` (nothing consumed yet).
    /// - Multiplication saturates instead of overflowing.
    pub fn delay(&self, attempts: u32) -> Duration {
        let linear = self.base.saturating_mul(attempts);
        self.jitter.apply(linear)
    }
}
