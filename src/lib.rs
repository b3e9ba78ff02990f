//! # mediavisor
//!
//! **Mediavisor** keeps asynchronously loading media resources playing through
//! transient failures: stalled fetches, abandoned downloads, rejected play requests,
//! unrequested pauses and decode errors on poisoned cache entries.
//!
//! It drives each resource through an explicit state machine, retries with linear
//! backoff up to a ceiling, cache-busts the source after decode failures, and restarts
//! everything when the application returns to the foreground or is restored from the
//! history cache. It never renders or decodes media itself; resources are reached
//! through the [`MediaHandle`] seam.
//!
//! ## Architecture
//! ```text
//!   Document ──attach──► Supervisor ──Command──► Reactor (single task)
//!   host signals ──notify/lifecycle──┘              │
//!                                                   ├─► Registry (ManagedResource per handle)
//!                                                   ├─► transition(lifecycle, input) ──► effects
//!                                                   │     ├─ load() / play() / rewind() / set_source()
//!                                                   │     └─ Scheduler (keyed, cancellable timers)
//!                                                   └─► Bus (broadcast events)
//!                                                          │
//!                                                  subscriber_listener
//!                                                          ▼
//!                                                    SubscriberSet
//!                                                 ┌────────┼────────┐
//!                                                 ▼        ▼        ▼
//!                                              worker1  worker2  workerN
//!                                            (LogWriter, custom subscribers)
//! ```
//!
//! ### Recovery
//! ```text
//! failure (rejection / decode error / unrequested pause / suspend / failed stall recheck)
//!   ├─► attempts += 1
//!   ├─ attempts == max_attempts ─► Failed (RetryExhausted), waits for restart_all()
//!   └─ otherwise ─► arm retry after retry_delay_base × attempts
//!                     └─ fires ─► [decode: rewrite source with t=<token>] ─► load (+play)
//! play confirmed ─► Playing, attempts = 0
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                           |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Supervision**   | Discovery, signals, restart-all, health snapshot              | [`Supervisor`], [`SupervisorBuilder`]        |
//! | **State machine** | Pure transition function, testable without a backend          | [`transition`], [`Lifecycle`], [`Effect`]    |
//! | **Media seam**    | Inject real or fake media backends                            | [`MediaHandle`], [`Document`]                |
//! | **Policies**      | Retry ceiling, linear backoff, jitter                         | [`RetryPolicy`], [`BackoffPolicy`]           |
//! | **Subscriber API**| Observe every signal, request and retry                       | [`Subscribe`], [`LogWriter`]                 |
//! | **Errors**        | Typed failure taxonomy                                        | [`FailureKind`], [`MediaError`], [`RuntimeError`] |
//! | **Configuration** | Centralized settings, fixed at construction                   | [`Config`]                                   |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use mediavisor::{Config, LogWriter, StaticDocument, Subscribe, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sup = Supervisor::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     // Real applications fill the document with their own MediaHandle impls.
//!     let doc = StaticDocument::new(Vec::new());
//!     sup.attach(&doc).await?;
//!
//!     sup.restart_all().await;
//!     assert!(sup.health_snapshot().await.is_empty());
//!     sup.shutdown().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod machine;
mod media;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Config, LifecycleSignal, ResourceHealth, ResourceId, Supervisor, SupervisorBuilder};
pub use error::{FailureKind, MediaError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use machine::{
    Deferred, Effect, Input, Lifecycle, MediaSignal, ResourceState, Transition, TransitionRules,
    transition,
};
pub use media::{
    CacheBuster, Document, MediaHandle, MediaRef, NetworkState, ReadyState, StaticDocument,
};
pub use policies::{BackoffPolicy, JitterPolicy, RetryDecision, RetryPolicy};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
