//! # Supervisor configuration.
//!
//! Provides [`Config`], the centralized settings for one supervisor. Configuration is
//! fixed at construction; there is no runtime reconfiguration.
//!
//! ## Sentinel values
//! - `max_attempts = 0` → the first failure is terminal (no automatic retries)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::machine::TransitionRules;
use crate::policies::{BackoffPolicy, JitterPolicy, RetryPolicy};

/// Configuration for a [`Supervisor`](crate::Supervisor).
///
/// ## Field semantics
/// - `max_attempts`: consecutive failures tolerated per resource before it is marked failed
/// - `retry_delay_base`: linear backoff unit; attempt `n` waits `base × n`
/// - `stall_recheck_delay`: wait between a stall signal and the readiness recheck
/// - `visibility_settle_delay`: wait between a foreground/restore signal and restart-all
/// - `jitter`: randomization applied to retry delays
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Retry ceiling per resource.
    pub max_attempts: u32,

    /// Linear backoff unit.
    pub retry_delay_base: Duration,

    /// Delay before a stalled resource's readiness is rechecked.
    ///
    /// If the resource is still below `HaveCurrentData` at recheck time it is
    /// reloaded, consuming one attempt.
    pub stall_recheck_delay: Duration,

    /// Settle delay before the lifecycle watcher restarts everything.
    ///
    /// Repeated visibility/restore signals inside this window coalesce into one restart.
    pub visibility_settle_delay: Duration,

    /// Jitter applied on top of the linear backoff.
    pub jitter: JitterPolicy,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the retry ceiling as a policy.
    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
        }
    }

    /// Returns the linear backoff policy.
    #[inline]
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            base: self.retry_delay_base,
            jitter: self.jitter,
        }
    }

    /// Bundles the parameters the state machine consults.
    pub fn transition_rules(&self) -> TransitionRules {
        TransitionRules {
            retry: self.retry_policy(),
            backoff: self.backoff_policy(),
            stall_recheck: self.stall_recheck_delay,
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_attempts = 3`
    /// - `retry_delay_base = 500ms`
    /// - `stall_recheck_delay = 1000ms`
    /// - `visibility_settle_delay = 300ms`
    /// - `jitter = None`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_base: Duration::from_millis(500),
            stall_recheck_delay: Duration::from_millis(1000),
            visibility_settle_delay: Duration::from_millis(300),
            jitter: JitterPolicy::None,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = Config::default();
        let rules = cfg.transition_rules();
        assert_eq!(rules.retry.max_attempts, 3);
        assert_eq!(rules.backoff.delay(1), Duration::from_millis(500));
        assert_eq!(rules.stall_recheck, Duration::from_millis(1000));
        assert_eq!(cfg.visibility_settle_delay, Duration::from_millis(300));
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
