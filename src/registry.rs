//! Handle registry
//!
//! Process-wide index from handle id to the live [`AudioHandle`] object.
//! The registry is an explicit, injectable value owned by the
//! [`BridgeClient`](crate::client::BridgeClient) and shared with the status
//! dispatcher, not module-level global state, so hosts get clean teardown
//! and tests get isolation.
//!
//! Entries are inserted exactly once, at handle construction, and never
//! removed: a released handle stays addressable so late status messages
//! still find their target instead of becoming ambiguous.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::handle::AudioHandle;

/// Unique identifier for an audio handle
///
/// Assigned at creation, immutable, never reused while the handle is live.
pub type HandleId = Uuid;

/// Mapping from handle id to live handle
#[derive(Debug, Default)]
pub struct HandleRegistry {
    handles: DashMap<HandleId, Arc<AudioHandle>>,
}

impl HandleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handles: DashMap::new(),
        }
    }

    /// Insert a handle under its id
    ///
    /// The id generator guarantees the id is not already present; a second
    /// insert under the same id would replace the first and is a bug in
    /// the caller.
    pub fn register(&self, handle: Arc<AudioHandle>) {
        self.handles.insert(handle.id(), handle);
    }

    /// Look up a handle by id
    ///
    /// Returns `None` for unknown ids. An unknown id is a normal, expected
    /// condition (late-arriving status for a torn-down session); callers
    /// log and ignore it rather than treating it as fatal.
    pub fn lookup(&self, id: &HandleId) -> Option<Arc<AudioHandle>> {
        self.handles.get(id).map(|entry| entry.value().clone())
    }

    /// Look up a handle by its wire (string) id
    ///
    /// Ids that do not parse as handle ids are unknown by definition.
    pub fn lookup_wire(&self, wire_id: &str) -> Option<Arc<AudioHandle>> {
        let id = Uuid::parse_str(wire_id).ok()?;
        self.lookup(&id)
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the registry has no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
