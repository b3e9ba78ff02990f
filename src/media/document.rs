//! # Discovery source.
//!
//! A [`Document`] lists the playable resources present when the supervisor attaches.
//! Discovery is one-shot: resources added afterwards are not managed.

use crate::media::handle::MediaRef;

/// Something that can be scanned once for playable media.
pub trait Document: Send + Sync {
    /// Returns every playable resource, in document order.
    fn media(&self) -> Vec<MediaRef>;
}

/// A fixed list of handles; useful for embedding and tests.
#[derive(Clone, Default)]
pub struct StaticDocument {
    media: Vec<MediaRef>,
}

impl StaticDocument {
    /// Creates a document holding the given handles.
    #[must_use]
    pub fn new(media: Vec<MediaRef>) -> Self {
        Self { media }
    }

    /// Appends one handle.
    #[must_use]
    pub fn with(mut self, handle: MediaRef) -> Self {
        self.media.push(handle);
        self
    }
}

impl Document for StaticDocument {
    fn media(&self) -> Vec<MediaRef> {
        self.media.clone()
    }
}
