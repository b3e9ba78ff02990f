//! # Retry ceiling.
//!
//! [`RetryPolicy`] decides, for a failure on a resource that has already consumed
//! `attempts` consecutive retries, whether another retry is armed or the resource
//! becomes terminally failed.
//!
//! Every failure consumes one attempt. The failure that brings the counter to
//! `max_attempts` is terminal:
//! ```text
//! max_attempts = 3
//!   failure #1 → attempts=1 → Retry
//!   failure #2 → attempts=2 → Retry
//!   failure #3 → attempts=3 → Exhausted
//! ```

/// Outcome of consulting the retry ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Arm a retry; `attempts` is the updated counter.
    Retry { attempts: u32 },
    /// Ceiling reached; `attempts` is the final counter (== `max_attempts`).
    Exhausted { attempts: u32 },
}

impl RetryDecision {
    /// The counter value after this decision.
    pub fn attempts(&self) -> u32 {
        match *self {
            RetryDecision::Retry { attempts } | RetryDecision::Exhausted { attempts } => attempts,
        }
    }
}

/// Bounded retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive failures tolerated before a resource is marked failed.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    /// Returns `max_attempts = 3`.
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl RetryPolicy {
    /// Consumes one attempt and decides whether to retry.
    ///
    /// The counter never exceeds `max_attempts` (a zero ceiling fails on the first
    /// failure with `attempts = 0`).
    pub fn decide(&self, attempts: u32) -> RetryDecision {
        if attempts >= self.max_attempts {
            return RetryDecision::Exhausted {
                attempts: self.max_attempts,
            };
        }
        let next = attempts + 1;
        if next >= self.max_attempts {
            RetryDecision::Exhausted { attempts: next }
        } else {
            RetryDecision::Retry { attempts: next }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_third_failure_exhausts_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.decide(0), RetryDecision::Retry { attempts: 1 });
        assert_eq!(policy.decide(1), RetryDecision::Retry { attempts: 2 });
        assert_eq!(policy.decide(2), RetryDecision::Exhausted { attempts: 3 });
    }

    #[test]
    fn test_counter_never_exceeds_ceiling() {
        let policy = RetryPolicy { max_attempts: 2 };
        for attempts in 0..10 {
            assert!(policy.decide(attempts).attempts() <= 2);
        }
    }

    #[test]
    fn test_zero_ceiling_fails_immediately() {
        let policy = RetryPolicy { max_attempts: 0 };
        assert_eq!(policy.decide(0), RetryDecision::Exhausted { attempts: 0 });
    }
}
