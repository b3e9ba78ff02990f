//! Retry and backoff policies.
//!
//! This module groups the knobs that control **whether** a failed resource is
//! retried and **how long** to wait before the retry fires.
//!
//! ## Contents
//! - [`RetryPolicy`]   retry ceiling; decides retry vs. terminal failure
//! - [`BackoffPolicy`] linear delay growth (`base × attempts`) + optional jitter
//! - [`JitterPolicy`]  randomization to keep many resources from reloading in lockstep
//!
//! ## Quick wiring
//! ```text
//! Config { max_attempts, retry_delay_base, jitter, .. }
//!      └─► machine::transition uses:
//!           - retry.decide(attempts) to arm a retry or fail
//!           - backoff.delay(attempts) to schedule the deferred action
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → max_attempts=3.
//! - `BackoffPolicy::default()` → base=500ms, linear, jitter=None.

mod backoff;
mod jitter;
mod retry;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use retry::{RetryDecision, RetryPolicy};
