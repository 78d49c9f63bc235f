//! Snapshot cache backing host history entries.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::SnapshotId;

// ============================================================================
// ScrollPosition
// ============================================================================

/// Viewport scroll offsets in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

impl ScrollPosition {
    /// Creates a position.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// An immutable capture of one page state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Identifier stored in the host history entry.
    pub id: SnapshotId,
    /// Address of the page.
    pub url: String,
    /// Full document markup.
    pub markup: String,
    /// Scroll offsets at capture time.
    pub scroll: ScrollPosition,
}

// ============================================================================
// HistoryCache
// ============================================================================

/// Append-only map from snapshot ids to snapshots.
///
/// Entries are never evicted, so every id the host history holds stays
/// resolvable for the life of the cache. Shared between the engine and its
/// frames as an `Arc<HistoryCache>`.
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: RwLock<FxHashMap<SnapshotId, Arc<Snapshot>>>,
}

impl HistoryCache {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot under a fresh id and returns the id.
    pub fn save(&self, url: impl Into<String>, markup: impl Into<String>, scroll: ScrollPosition) -> SnapshotId {
        let id = SnapshotId::generate();
        let snapshot = Snapshot {
            id,
            url: url.into(),
            markup: markup.into(),
            scroll,
        };
        debug!(snapshot_id = %id, url = %snapshot.url, "Saved snapshot");
        self.entries.write().insert(id, Arc::new(snapshot));
        id
    }

    /// Looks up a snapshot.
    #[must_use]
    pub fn get(&self, id: SnapshotId) -> Option<Arc<Snapshot>> {
        self.entries.read().get(&id).cloned()
    }

    /// Looks up a snapshot that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotNotFound`] for unknown ids.
    pub fn require(&self, id: SnapshotId) -> Result<Arc<Snapshot>> {
        self.get(id).ok_or_else(|| Error::snapshot_not_found(id))
    }

    /// Returns `true` if the id is known.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: SnapshotId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Number of stored snapshots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing has been saved yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
