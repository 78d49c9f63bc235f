//! History restore.

use tracing::{info, warn};

use crate::dom::Document;
use crate::error::Result;
use crate::history::ScrollPosition;
use crate::identifiers::SnapshotId;

use super::core::Engine;
use super::events::Dispatch;

impl Engine {
    /// Restores the snapshot a history entry points at.
    ///
    /// A missing or unknown id, or any failure while restoring, triggers a
    /// full reload of the current address. The document is only swapped
    /// once the restore has fully succeeded.
    pub async fn history_pop(&self, state: Option<SnapshotId>) -> Dispatch {
        let session = &self.inner.session;

        let Some(id) = state else {
            let location = session.host.location();
            warn!(url = %location, "History entry has no snapshot, reloading");
            session.host.reload(&location);
            return Dispatch::Reloaded;
        };

        match self.restore(id) {
            Ok(scroll) => {
                session.host.scroll_to(scroll);
                session.schedule_load();
                info!(snapshot_id = %id, "Snapshot restored");
                self.connect_frames().await;
                Dispatch::Restored(id)
            }
            Err(e) => {
                let location = session.host.location();
                warn!(snapshot_id = %id, error = %e, url = %location, "Restore failed, reloading");
                session.host.reload(&location);
                Dispatch::Reloaded
            }
        }
    }

    fn restore(&self, id: SnapshotId) -> Result<ScrollPosition> {
        let session = &self.inner.session;
        let snapshot = session.history.require(id)?;
        let source = Document::parse(&snapshot.markup)?;
        session.render_document(&source)?;
        Ok(snapshot.scroll)
    }
}
