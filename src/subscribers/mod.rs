//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out, and the
//! built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Reactor ── publish(Event) ──► Bus ──► supervisor listener ──► SubscriberSet::emit
//!                                                        ┌─────────┼─────────┐
//!                                                        ▼         ▼         ▼
//!                                                   LogWriter   Metrics   Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use mediavisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::RetryExhausted {
//!             // page an operator, show a placeholder, ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
