//! # Media abstraction.
//!
//! The supervisor never renders or decodes anything itself; it drives a resource's
//! load/play lifecycle through the [`MediaHandle`] seam and discovers handles through
//! a [`Document`].
//!
//! - [`MediaHandle`] / [`MediaRef`]: one playable resource (borrowed from the document)
//! - [`ReadyState`], [`NetworkState`]: raw readiness probes
//! - [`Document`], [`StaticDocument`]: one-shot discovery source
//! - [`CacheBuster`]: monotonic cache-busting source rewrites

mod cache_bust;
mod document;
mod handle;

#[cfg(test)]
pub(crate) mod fake;

pub use cache_bust::CacheBuster;
pub use document::{Document, StaticDocument};
pub use handle::{MediaHandle, MediaRef, NetworkState, ReadyState};
