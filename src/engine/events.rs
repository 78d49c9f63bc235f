//! Events in, outcomes out.

// ============================================================================
// Imports
// ============================================================================

use crate::dom::Document;
use crate::identifiers::{NodeId, SnapshotId};
use crate::stream::StreamReport;

// ============================================================================
// DomEvent
// ============================================================================

/// Browser event routed into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    /// A click whose target is `target`.
    Click {
        /// Innermost clicked node.
        target: NodeId,
    },
    /// A form submission.
    Submit {
        /// The submitted form, or a node inside it.
        target: NodeId,
    },
    /// Back/forward navigation.
    PopState {
        /// State stored in the history entry, if any.
        state: Option<SnapshotId>,
    },
    /// The window `load` event.
    Load,
}

// ============================================================================
// Dispatch
// ============================================================================

/// What the engine did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not ours: no link/form, or opted out. The host should let the
    /// browser handle it.
    Ignored,
    /// A page was rendered and pushed at `url`.
    Page {
        /// Final address of the rendered page.
        url: String,
    },
    /// A stream response was applied to the page.
    Streamed(StreamReport),
    /// The event was handled by the frame element `frame`.
    Frame(NodeId),
    /// A snapshot was restored.
    Restored(SnapshotId),
    /// The engine fell back to a full reload.
    Reloaded,
    /// `turbo:load` was emitted.
    Loaded,
}

impl Dispatch {
    /// Returns `true` if the engine took over the event.
    #[inline]
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

// ============================================================================
// Trigger
// ============================================================================

/// An event target classified once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// An `<a href>` (possibly an ancestor of the event target).
    Link {
        /// The link element.
        element: NodeId,
    },
    /// A `<form>` (possibly an ancestor of the event target).
    Form {
        /// The form element.
        element: NodeId,
    },
    /// Anything else.
    Opaque,
}

impl Trigger {
    /// Classifies `node`: the nearest `<a href>` wins, then the nearest
    /// `<form>`.
    #[must_use]
    pub fn classify(document: &Document, node: NodeId) -> Self {
        if let Some(element) = document.closest(node, |e| e.is("a") && e.has_attr("href")) {
            return Self::Link { element };
        }
        if let Some(element) = document.closest_named(node, "form") {
            return Self::Form { element };
        }
        Self::Opaque
    }

    /// The element behind the trigger.
    #[inline]
    #[must_use]
    pub fn element(&self) -> Option<NodeId> {
        match self {
            Self::Link { element } | Self::Form { element } => Some(*element),
            Self::Opaque => None,
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
    fn test_classify_link_from_descendant() {
        let doc = Document::parse(r#"<a id="l" href="/x"><span id="s">go</span></a>"#).unwrap();
        let span = doc.by_id("s").unwrap();
        let link = doc.by_id("l").unwrap();
        assert_eq!(Trigger::classify(&doc, span), Trigger::Link { element: link });
    }

    #[test]
    fn test_anchor_without_href_is_not_a_link() {
        let doc = Document::parse(r#"<a id="l">x</a>"#).unwrap();
        let link = doc.by_id("l").unwrap();
        assert_eq!(Trigger::classify(&doc, link), Trigger::Opaque);
    }

    #[test]
    fn test_classify_form() {
        let doc = Document::parse(r#"<form id="f"><button id="b">go</button></form>"#).unwrap();
        let button = doc.by_id("b").unwrap();
        let form = doc.by_id("f").unwrap();
        let trigger = Trigger::classify(&doc, button);
        assert_eq!(trigger, Trigger::Form { element: form });
        assert_eq!(trigger.element(), Some(form));
    }

    #[test]
    fn test_dispatch_is_handled() {
        assert!(!Dispatch::Ignored.is_handled());
        assert!(Dispatch::Reloaded.is_handled());
    }
}
