//! Engine struct and accessors.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::dom::{Document, SharedDocument};
use crate::error::Result;
use crate::frame::Frame;
use crate::history::HistoryCache;
use crate::host::Host;
use crate::http::{RequestNegotiable, Transport};
use crate::identifiers::{NodeId, SnapshotId};
use crate::session::Session;

use super::builder::EngineBuilder;
use super::events::{Dispatch, DomEvent};

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the engine.
pub(crate) struct EngineInner {
    /// Document, services and configuration shared with frames.
    pub session: Arc<Session>,

    /// Connected frames keyed by their element.
    pub frames: Mutex<FxHashMap<NodeId, Frame>>,
}

// ============================================================================
// Engine
// ============================================================================

/// Progressive navigation engine for one document.
///
/// Cheap to clone; clones share the document, history cache and frames.
#[derive(Clone)]
pub struct Engine {
    pub(crate) inner: Arc<EngineInner>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.inner.session)
            .field("frame_count", &self.frame_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Engine - Construction
// ============================================================================

impl Engine {
    /// Creates a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub(crate) fn from_session(session: Session) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                session: Arc::new(session),
                frames: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    /// Snapshots the initial page into the current history entry and
    /// connects every frame on the page.
    ///
    /// Call once after the host has loaded the document.
    pub async fn start(&self) -> SnapshotId {
        let id = self.inner.session.capture();
        info!(snapshot_id = %id, url = %self.inner.session.host.location(), "Engine started");
        self.connect_frames().await;
        id
    }
}

// ============================================================================
// Engine - Accessors
// ============================================================================

impl Engine {
    /// The shared history cache.
    #[inline]
    #[must_use]
    pub fn history(&self) -> &Arc<HistoryCache> {
        &self.inner.session.history
    }

    /// Runs `read` with the live document locked.
    ///
    /// Do not call back into the engine from `read`.
    pub fn with_document<R>(&self, read: impl FnOnce(&Document) -> R) -> R {
        read(&self.inner.session.document.lock())
    }

    /// Runs `mutate` with the live document locked, as user input would
    /// (typing into controls, toggling checkboxes).
    pub fn with_document_mut<R>(&self, mutate: impl FnOnce(&mut Document) -> R) -> R {
        mutate(&mut self.inner.session.document.lock())
    }

    /// Serializes the live document.
    #[must_use]
    pub fn html(&self) -> String {
        self.inner.session.document.lock().to_html()
    }
}

// ============================================================================
// Engine - Tasks
// ============================================================================

impl Engine {
    /// Dispatches `event` on its own task.
    ///
    /// Each spawned event is an independent navigation; overlapping ones
    /// are not serialized and the last to render wins.
    pub fn spawn(&self, event: DomEvent) -> JoinHandle<Result<Dispatch>> {
        let engine = self.clone();
        tokio::spawn(async move { engine.dispatch(event).await })
    }

    /// Dispatches `event` on its own task and waits for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Task`](crate::Error::Task) if the task panicked,
    /// otherwise whatever the dispatch returned.
    pub async fn run(&self, event: DomEvent) -> Result<Dispatch> {
        self.spawn(event).await?
    }
}

// ============================================================================
// RequestNegotiable
// ============================================================================

impl RequestNegotiable for Engine {
    fn document(&self) -> &SharedDocument {
        &self.inner.session.document
    }

    fn config(&self) -> &Config {
        &self.inner.session.config
    }

    fn transport(&self) -> &dyn Transport {
        self.inner.session.transport.as_ref()
    }

    fn host(&self) -> &dyn Host {
        self.inner.session.host.as_ref()
    }
}
