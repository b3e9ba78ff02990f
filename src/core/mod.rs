//! Runtime core: the reaction loop and its public handle.
//!
//! The only public API from this module is [`Supervisor`] (built through
//! [`SupervisorBuilder`] from a [`Config`]) plus the data it reports.
//!
//! Internal modules:
//! - [`reactor`]: the single loop that owns the registry and applies effects;
//! - [`registry`]: managed resources keyed by [`ResourceId`];
//! - [`scheduler`]: cancellable delayed actions with stale-firing detection;
//! - [`watcher`]: turns lifecycle signals into a settle-delayed restart;
//! - [`supervisor`]: the handle callers hold;
//! - [`builder`]: wires bus, subscribers and reactor together.

mod builder;
mod config;
mod reactor;
mod registry;
mod scheduler;
mod supervisor;
mod watcher;

pub use builder::SupervisorBuilder;
pub use config::Config;
pub use registry::{ResourceHealth, ResourceId};
pub use supervisor::Supervisor;
pub use watcher::LifecycleSignal;
