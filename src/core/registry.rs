//! # Registry of managed resources.
//!
//! The registry is owned by the reactor and mutated only from the reaction loop, so it
//! needs no locking. Records are created once at discovery and live until the
//! supervisor is torn down; there is no per-resource removal.
//!
//! ## Rules
//! - Ids are assigned in discovery order, starting at 0.
//! - Discovery runs once; [`Registry::is_attached`] guards re-scans.
//! - Iteration order is id order (snapshots are stable).

use std::fmt;

use crate::machine::Lifecycle;
use crate::media::{MediaRef, NetworkState, ReadyState};

/// Stable identifier of a managed resource (its discovery index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(usize);

impl ResourceId {
    /// Wraps a discovery index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The discovery index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One supervised media resource.
pub struct ManagedResource {
    pub id: ResourceId,
    /// Borrowed from the document; the supervisor drives only its lifecycle.
    pub handle: MediaRef,
    pub lifecycle: Lifecycle,
}

impl ManagedResource {
    fn new(id: ResourceId, handle: MediaRef) -> Self {
        let autoplay = handle.autoplay();
        Self {
            id,
            handle,
            lifecycle: Lifecycle::new(autoplay),
        }
    }

    pub fn label(&self) -> &str {
        self.handle.label()
    }

    /// Lifecycle facts combined with the handle's raw probes.
    pub fn health(&self) -> ResourceHealth {
        let lc = &self.lifecycle;
        ResourceHealth {
            id: self.id,
            label: self.label().to_string(),
            state: lc.state.to_string(),
            autoplay: lc.autoplay,
            loaded: lc.loaded,
            playing: lc.playing,
            attempts: lc.attempts,
            failed: lc.is_failed(),
            paused: self.handle.is_paused(),
            ready_state: self.handle.ready_state(),
            network_state: self.handle.network_state(),
            error: self.handle.last_error(),
        }
    }
}

/// Health of one resource, as reported by
/// [`Supervisor::health_snapshot`](crate::Supervisor::health_snapshot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceHealth {
    pub id: ResourceId,
    pub label: String,
    /// Lifecycle state (display form, e.g. `retrying(decode_failure)`).
    pub state: String,
    pub autoplay: bool,
    pub loaded: bool,
    pub playing: bool,
    pub attempts: u32,
    /// Terminal failure; needs a restart.
    pub failed: bool,
    /// Raw paused flag from the handle.
    pub paused: bool,
    /// Raw readiness from the handle.
    pub ready_state: ReadyState,
    /// Raw network state from the handle.
    pub network_state: NetworkState,
    /// Last backend error, if any.
    pub error: Option<String>,
}

impl ResourceHealth {
    /// Raw numeric readiness level (0–4).
    pub fn raw_ready_state(&self) -> u8 {
        self.ready_state.as_raw()
    }
}

/// Discovery-ordered set of managed resources.
#[derive(Default)]
pub struct Registry {
    resources: Vec<ManagedResource>,
    attached: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether discovery already ran.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Registers every handle in order and marks discovery done.
    ///
    /// Returns the ids assigned.
    pub fn attach(&mut self, handles: Vec<MediaRef>) -> Vec<ResourceId> {
        self.attached = true;
        let start = self.resources.len();
        handles
            .into_iter()
            .enumerate()
            .map(|(offset, handle)| {
                let id = ResourceId::new(start + offset);
                self.resources.push(ManagedResource::new(id, handle));
                id
            })
            .collect()
    }

    pub fn get(&self, id: ResourceId) -> Option<&ManagedResource> {
        self.resources.get(id.index())
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut ManagedResource> {
        self.resources.get_mut(id.index())
    }

    /// All ids, in discovery order.
    pub fn ids(&self) -> Vec<ResourceId> {
        self.resources.iter().map(|r| r.id).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Health of every resource, in discovery order.
    pub fn snapshot(&self) -> Vec<ResourceHealth> {
        self.resources.iter().map(ManagedResource::health).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::ResourceState;
    use crate::media::fake::FakeMedia;

    #[test]
    fn test_empty_snapshot() {
        let reg = Registry::new();
        assert!(reg.snapshot().is_empty());
        assert!(!reg.is_attached());
    }

    #[test]
    fn test_attach_assigns_ids_in_order() {
        let mut reg = Registry::new();
        let media: Vec<MediaRef> = vec![FakeMedia::new("a", true), FakeMedia::new("b", false)];
        let ids = reg.attach(media);
        assert_eq!(ids, vec![ResourceId::new(0), ResourceId::new(1)]);
        assert!(reg.is_attached());

        let b = reg.get(ResourceId::new(1)).unwrap();
        assert_eq!(b.label(), "b");
        assert!(!b.lifecycle.autoplay);
        assert_eq!(b.lifecycle.state, ResourceState::Idle);
        assert!(reg.get(ResourceId::new(2)).is_none());
    }

    #[test]
    fn test_health_reports_raw_probes() {
        let mut reg = Registry::new();
        let media = FakeMedia::new("hero", true);
        media.set_ready(ReadyState::HaveFutureData);
        reg.attach(vec![media as MediaRef]);

        let health = reg.snapshot();
        assert_eq!(health.len(), 1);
        assert_eq!(health[0].raw_ready_state(), 3);
        assert_eq!(health[0].state, "idle");
        assert_eq!(health[0].attempts, 0);
    }
}
