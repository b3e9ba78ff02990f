//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to everything the reaction loop observes and does.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the reactor (signals, requests, retries, exhaustion, restarts),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the supervisor's listener (fans out to `SubscriberSet`), and
//!   anyone holding a receiver from [`Supervisor::subscribe`](crate::Supervisor::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
