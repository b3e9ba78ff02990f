//! # Subscriber trait
//!
//! `Subscribe` is the extension point for observing what the supervisor sees and does:
//! signals, outbound requests, scheduled retries, exhaustion and restarts. Each
//! subscriber gets its own worker and bounded queue inside the
//! [`SubscriberSet`](crate::SubscriberSet), so a slow sink never delays the reactor.
//!
//! ## Contract
//! - `on_event` may be slow; it runs on the subscriber's worker.
//! - `wants` filters before enqueueing; rejected kinds never occupy queue slots.
//! - When the queue is full the event is dropped for this subscriber only and a
//!   `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use mediavisor::{Event, EventKind, Subscribe};
//!
//! struct ExhaustionAudit;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for ExhaustionAudit {
//!     async fn on_event(&self, ev: &Event) {
//!         let _ = (ev.resource, ev.attempt, ev.cause);
//!     }
//!     fn wants(&self, kind: EventKind) -> bool {
//!         kind == EventKind::RetryExhausted
//!     }
//!     fn name(&self) -> &'static str { "exhaustion-audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Whether events of `kind` should be delivered at all.
    fn wants(&self, _kind: EventKind) -> bool {
        true
    }

    /// Human-readable name (for overflow/panic reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        256
    }
}
