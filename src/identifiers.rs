//! Type-safe identifiers.
//!
//! Newtype wrappers keep snapshot ids and arena node ids from being mixed
//! up with each other or with plain integers and strings.
//!
//! | Type | Backing | Source |
//! |------|---------|--------|
//! | [`SnapshotId`] | UUID v4 | [`HistoryCache::save`](crate::HistoryCache::save) |
//! | [`NodeId`] | arena slot and generation | [`Document`](crate::Document) |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// ============================================================================
// SnapshotId
// ============================================================================

/// Opaque identifier of a history snapshot.
///
/// This is the only value the engine stores in the host's history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Generates a new random identifier.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SnapshotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// NodeId
// ============================================================================

/// Slot of a node inside a [`Document`](crate::Document) arena.
///
/// Ids are only meaningful for the document that produced them. An id stays
/// valid while its node is reachable from the root, and for detached nodes
/// until the document collects them. Collected slots are reused under a new
/// generation, so a stale id resolves to nothing instead of another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The document node, always the first arena slot.
    pub const ROOT: NodeId = NodeId {
        index: 0,
        generation: 0,
    };

    /// Creates an id from an arena index and slot generation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `index` does not fit the id width.
    pub(crate) fn try_new(index: usize, generation: u32) -> Result<Self, Error> {
        let index = u32::try_from(index)
            .map_err(|_| Error::invalid_node(NodeId::ROOT, format!("arena index {index} is out of range")))?;
        Ok(Self { index, generation })
    }

    /// Returns the arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the slot generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "node#{}", self.index)
        } else {
            write!(f, "node#{}v{}", self.index, self.generation)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_ids_are_unique() {
        let a = SnapshotId::generate();
        let b = SnapshotId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_snapshot_id_round_trips_through_string() {
        let id = SnapshotId::generate();
        let parsed: SnapshotId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_snapshot_id_serializes_transparently() {
        let id = SnapshotId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::ROOT.to_string(), "node#0");
        let id = NodeId::try_new(7, 2).unwrap();
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 2);
        assert_eq!(id.to_string(), "node#7v2");
    }

    #[test]
    fn test_node_id_rejects_out_of_range_index() {
        let err = NodeId::try_new(u32::MAX as usize + 1, 0).unwrap_err();
        assert!(err.is_document_error());
        assert_eq!(NodeId::try_new(u32::MAX as usize, 0).unwrap().index(), u32::MAX as usize);
    }
}
