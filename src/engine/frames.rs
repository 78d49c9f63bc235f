//! Frame registry and connection.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::frame::Frame;
use crate::identifiers::NodeId;

use super::core::Engine;

/// Upper bound on connect passes after one render; each pass picks up
/// frames that the previous pass's loads inserted.
const MAX_CONNECT_PASSES: usize = 16;

impl Engine {
    /// The frame for the element `node`, registering it if needed.
    #[must_use]
    pub fn frame(&self, node: NodeId) -> Frame {
        self.inner
            .frames
            .lock()
            .entry(node)
            .or_insert_with(|| Frame::new(node, Arc::clone(&self.inner.session)))
            .clone()
    }

    /// Frame registered for the element with the given `id`.
    #[must_use]
    pub fn frame_by_id(&self, id: &str) -> Option<Frame> {
        let node = self.with_document(|document| document.by_id(id))?;
        self.inner.frames.lock().get(&node).cloned()
    }

    /// Number of connected frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.inner.frames.lock().len()
    }

    /// Connects every frame element in the document that is not connected
    /// yet, loading those with a `src`, and forgets frames whose element
    /// left the document.
    pub(crate) async fn connect_frames(&self) {
        let tag = self.inner.session.config.frame_tag.clone();

        for _ in 0..MAX_CONNECT_PASSES {
            let pending: Vec<(Frame, String)> = {
                let document = self.inner.session.document.lock();
                let mut frames = self.inner.frames.lock();

                frames.retain(|node, _| {
                    document.is_connected(*node) && document.element(*node).is_some_and(|e| e.is(&tag))
                });

                let mut pending = Vec::new();
                for node in document.elements_named(&tag) {
                    if frames.contains_key(&node) {
                        continue;
                    }
                    let frame = Frame::new(node, Arc::clone(&self.inner.session));
                    frames.insert(node, frame.clone());
                    debug!(frame = %node, "Frame connected");

                    let src = document
                        .element(node)
                        .and_then(|e| e.attr("src"))
                        .filter(|src| !src.is_empty());
                    if let Some(src) = src {
                        pending.push((frame, src.to_string()));
                    }
                }
                pending
            };

            if pending.is_empty() {
                return;
            }

            let loads = pending.iter().map(|(frame, src)| frame.load(src));
            let results = join_all(loads).await;
            for ((frame, src), result) in pending.iter().zip(results) {
                if let Err(e) = result {
                    warn!(frame = %frame.element(), src = %src, error = %e, "Frame load failed");
                }
            }
        }
        warn!(passes = MAX_CONNECT_PASSES, "Stopped connecting nested frames");
    }
}
