//! History snapshot storage.
//!
//! | Type | Role |
//! |------|------|
//! | [`HistoryCache`] | Append-only `SnapshotId -> Snapshot` map |
//! | [`Snapshot`] | URL, full markup and scroll offsets of one page state |
//! | [`ScrollPosition`] | Viewport offsets |

mod cache;

pub use cache::{HistoryCache, ScrollPosition, Snapshot};
