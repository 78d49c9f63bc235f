//! Collaborators shared by the engine and every frame.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::dom::{Document, SharedDocument};
use crate::error::Result;
use crate::history::HistoryCache;
use crate::host::{Host, LifecycleEvent};
use crate::http::Transport;
use crate::identifiers::{NodeId, SnapshotId};
use crate::reconcile::{ReconcileOptions, Reconciler};
use crate::stream::{StreamProcessor, StreamReport};

// ============================================================================
// Session
// ============================================================================

/// Live document plus the services that act on it.
pub(crate) struct Session {
    pub config: Config,
    pub document: SharedDocument,
    pub history: Arc<HistoryCache>,
    pub transport: Arc<dyn Transport>,
    pub host: Arc<dyn Host>,
    pub reconciler: Arc<dyn Reconciler>,
    pub streams: StreamProcessor,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("reconciler", &self.reconciler)
            .field("snapshots", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Schedules `turbo:load` for the next animation frame.
    pub fn schedule_load(&self) {
        let host = Arc::clone(&self.host);
        self.host
            .request_animation_frame(Box::new(move || host.dispatch(LifecycleEvent::Load)));
    }

    /// Snapshots the live document at the current address and stores the
    /// id in the current history entry.
    pub fn capture(&self) -> SnapshotId {
        let markup = self.document.lock().to_html();
        let url = self.host.location();
        let id = self.history.save(url, markup, self.host.scroll_position());
        self.host.replace_state(id);
        id
    }

    /// Runs `mutate` on a copy of the live document and swaps the copy in
    /// only if it succeeds. Nodes the mutation detached are freed.
    pub fn commit<F, R>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut Document) -> Result<R>,
    {
        let mut document = self.document.lock();
        let mut draft = document.clone();
        let result = mutate(&mut draft)?;
        sweep(&mut draft);
        *document = draft;
        Ok(result)
    }

    /// Reconciles the whole live document against `source`.
    pub fn render_document(&self, source: &Document) -> Result<()> {
        self.commit(|document| {
            self.reconciler
                .reconcile(document, NodeId::ROOT, source, source.root(), ReconcileOptions::full())
                .map(|_| ())
        })
    }

    /// Applies a stream document to the live document.
    pub fn apply_stream(&self, markup: &str) -> Result<StreamReport> {
        let mut document = self.document.lock();
        let report = self.streams.apply(&mut document, markup)?;
        sweep(&mut document);
        debug!(applied = report.applied, "Stream applied to document");
        Ok(report)
    }
}

/// Frees the nodes left unreachable by an in-place mutation.
pub(crate) fn sweep(document: &mut Document) {
    let freed = document.collect_garbage();
    if freed > 0 {
        debug!(freed, slots = document.arena_len(), "Freed detached nodes");
    }
}
