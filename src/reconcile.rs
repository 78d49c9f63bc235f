//! Live-document reconciliation.
//!
//! A [`Reconciler`] rewrites a live node in place until it serializes like
//! a target node from another document, keeping the identity of every live
//! node it can match. Matched nodes keep their [`NodeId`], and form controls
//! keep the value the user typed unless the new markup changes it.
//!
//! [`Morph`] is the default implementation:
//!
//! | Step | Behaviour |
//! |------|-----------|
//! | Kind mismatch | Live node replaced by an imported copy of the target |
//! | Attributes | Replaced wholesale when they differ |
//! | Control state | Reset only when the governing attribute changed |
//! | Children | Keyed by `id`, then unkeyed in order, leftovers detached |

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Debug;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::dom::{Document, ElementData, NodeData};
use crate::error::{Error, Result};
use crate::identifiers::NodeId;

// ============================================================================
// ReconcileOptions
// ============================================================================

/// Options for a single reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Only reconcile the children; the live node's own attributes stay.
    pub children_only: bool,
}

impl ReconcileOptions {
    /// Reconcile the node itself and its subtree.
    #[inline]
    #[must_use]
    pub const fn full() -> Self {
        Self {
            children_only: false,
        }
    }

    /// Reconcile only the children of the node.
    #[inline]
    #[must_use]
    pub const fn children_only() -> Self {
        Self {
            children_only: true,
        }
    }
}

// ============================================================================
// Reconciler Trait
// ============================================================================

/// DOM diff/patch primitive.
pub trait Reconciler: Debug + Send + Sync {
    /// Makes `node` in `live` match `target` in `source`.
    ///
    /// Returns the live node now standing for `target`; it differs from
    /// `node` only when the node had to be replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] for unknown ids and
    /// [`Error::InvalidNode`] when a document node would have to be
    /// replaced by something else.
    fn reconcile(
        &self,
        live: &mut Document,
        node: NodeId,
        source: &Document,
        target: NodeId,
        options: ReconcileOptions,
    ) -> Result<NodeId>;
}

// ============================================================================
// Morph
// ============================================================================

/// Keyed, index-based reconciler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Morph;

impl Morph {
    /// Creates the reconciler.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reconciler for Morph {
    fn reconcile(
        &self,
        live: &mut Document,
        node: NodeId,
        source: &Document,
        target: NodeId,
        options: ReconcileOptions,
    ) -> Result<NodeId> {
        if live.data(node).is_none() {
            return Err(Error::node_not_found(node));
        }
        if source.data(target).is_none() {
            return Err(Error::node_not_found(target));
        }

        if options.children_only {
            morph_children(live, node, source, target)?;
            return Ok(node);
        }
        morph_node(live, node, source, target)
    }
}

fn morph_node(live: &mut Document, node: NodeId, source: &Document, target: NodeId) -> Result<NodeId> {
    let target_data = source
        .data(target)
        .ok_or_else(|| Error::node_not_found(target))?;
    let same_kind = live
        .data(node)
        .is_some_and(|live_data| live_data.same_kind(target_data));

    if !same_kind {
        if matches!(target_data, NodeData::Document) || node == live.root() {
            return Err(Error::invalid_node(node, "document node cannot be replaced"));
        }
        let replacement = live.import(source, target)?;
        if live.parent(node).is_some() {
            live.replace(node, replacement)?;
        }
        trace!(node = %node, replacement = %replacement, "Replaced node");
        return Ok(replacement);
    }

    match target_data {
        NodeData::Document => {
            live.set_doctype(source.doctype().map(str::to_string));
            morph_children(live, node, source, target)?;
        }
        NodeData::Text(text) | NodeData::Comment(text) => {
            let changed = matches!(
                live.data(node),
                Some(NodeData::Text(existing) | NodeData::Comment(existing)) if existing != text
            );
            if changed {
                live.set_text(node, text.clone())?;
            }
        }
        NodeData::Element(target_element) => {
            if target_element.is("textarea") && live.text_content(node) != source.text_content(target) {
                if let Some(element) = live.element_mut(node) {
                    element.value = None;
                }
            }
            sync_attributes(live, node, target_element);
            morph_children(live, node, source, target)?;
        }
    }
    Ok(node)
}

fn sync_attributes(live: &mut Document, node: NodeId, target: &ElementData) {
    let Some(element) = live.element_mut(node) else {
        return;
    };

    let value_changed = element.attr("value") != target.attr("value");
    let checked_changed = element.has_attr("checked") != target.has_attr("checked")
        || element.has_attr("selected") != target.has_attr("selected");

    if element.attributes() != target.attributes() {
        element.replace_attributes(target.attributes().to_vec());
    }
    if value_changed {
        element.value = None;
    }
    if checked_changed {
        element.checked = None;
    }
}

fn morph_children(live: &mut Document, parent: NodeId, source: &Document, target_parent: NodeId) -> Result<()> {
    let target_children = source.children(target_parent).to_vec();
    let live_children = live.children(parent).to_vec();

    let mut keyed: FxHashMap<String, NodeId> = FxHashMap::default();
    for child in &live_children {
        if let Some(id) = live.element(*child).and_then(ElementData::id) {
            keyed.entry(id.to_string()).or_insert(*child);
        }
    }

    let mut used: FxHashSet<NodeId> = FxHashSet::default();
    let mut cursor = 0;
    let mut next_children = Vec::with_capacity(target_children.len());

    for target_child in target_children {
        let Some(target_data) = source.data(target_child) else {
            continue;
        };
        let key = source.element(target_child).and_then(ElementData::id);

        let matched = match key {
            Some(key) => keyed.get(key).copied().filter(|candidate| {
                !used.contains(candidate)
                    && live.data(*candidate).is_some_and(|d| d.same_kind(target_data))
            }),
            None => {
                let found = live_children[cursor.min(live_children.len())..]
                    .iter()
                    .position(|candidate| {
                        !used.contains(candidate)
                            && live.element(*candidate).and_then(ElementData::id).is_none()
                            && live.data(*candidate).is_some_and(|d| d.same_kind(target_data))
                    })
                    .map(|offset| cursor + offset);
                found.map(|index| {
                    cursor = index + 1;
                    live_children[index]
                })
            }
        };

        let next = match matched {
            Some(existing) => {
                used.insert(existing);
                morph_node(live, existing, source, target_child)?
            }
            None => live.import(source, target_child)?,
        };
        next_children.push(next);
    }

    live.set_children(parent, next_children)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn morph(live: &mut Document, markup: &str) -> Document {
        let source = Document::parse(markup).unwrap();
        Morph
            .reconcile(live, NodeId::ROOT, &source, source.root(), ReconcileOptions::full())
            .unwrap();
        source
    }

    #[test]
    fn test_result_serializes_like_target() {
        let mut live = Document::parse(r#"<div id="a"><p>old</p><!--x--></div><span>gone</span>"#).unwrap();
        let source = morph(&mut live, r#"<div id="a" class="new"><p>new</p><em>added</em></div>"#);
        assert_eq!(live.to_html(), source.to_html());
    }

    #[test]
    fn test_keyed_children_keep_identity_when_reordered() {
        let mut live = Document::parse(r#"<ul><li id="a">A</li><li id="b">B</li></ul>"#).unwrap();
        let a = live.by_id("a").unwrap();
        let b = live.by_id("b").unwrap();

        morph(&mut live, r#"<ul><li id="b">B</li><li id="a">A!</li></ul>"#);

        assert_eq!(live.by_id("a"), Some(a));
        assert_eq!(live.by_id("b"), Some(b));
        assert_eq!(live.to_html(), r#"<ul><li id="b">B</li><li id="a">A!</li></ul>"#);
    }

    #[test]
    fn test_changed_tag_replaces_node() {
        let mut live = Document::parse(r#"<div id="a"></div>"#).unwrap();
        let before = live.by_id("a").unwrap();
        morph(&mut live, r#"<section id="a"></section>"#);
        let after = live.by_id("a").unwrap();

        assert_ne!(before, after);
        assert!(!live.is_connected(before));
    }

    #[test]
    fn test_typed_value_survives_unchanged_markup() {
        let mut live = Document::parse(r#"<form><input id="q" name="q" value="a"></form>"#).unwrap();
        let q = live.by_id("q").unwrap();
        live.set_value(q, "typed").unwrap();

        morph(&mut live, r#"<form><input id="q" name="q" value="a"></form>"#);
        assert_eq!(live.element(q).unwrap().value(), Some("typed"));

        morph(&mut live, r#"<form><input id="q" name="q" value="server"></form>"#);
        assert_eq!(live.element(q).unwrap().value(), Some("server"));
    }

    #[test]
    fn test_checked_state_reset_when_attribute_changes() {
        let mut live = Document::parse(r#"<input id="c" type="checkbox">"#).unwrap();
        let c = live.by_id("c").unwrap();
        live.set_checked(c, true).unwrap();

        morph(&mut live, r#"<input id="c" type="checkbox">"#);
        assert!(live.element(c).unwrap().is_checked());

        morph(&mut live, r#"<input id="c" type="checkbox" checked>"#);
        morph(&mut live, r#"<input id="c" type="checkbox">"#);
        assert!(!live.element(c).unwrap().is_checked());
    }

    #[test]
    fn test_children_only_keeps_container_attributes() {
        let mut live = Document::parse(r#"<turbo-frame id="f" src="/f"><p>loading</p></turbo-frame>"#).unwrap();
        let frame = live.by_id("f").unwrap();
        let source = Document::parse("<body><p>loaded</p></body>").unwrap();
        let body = source.body().unwrap();

        let result = Morph
            .reconcile(&mut live, frame, &source, body, ReconcileOptions::children_only())
            .unwrap();

        assert_eq!(result, frame);
        assert_eq!(
            live.outer_html(frame),
            r#"<turbo-frame id="f" src="/f"><p>loaded</p></turbo-frame>"#
        );
    }

    #[test]
    fn test_doctype_is_synced() {
        let mut live = Document::parse("<html></html>").unwrap();
        morph(&mut live, "<!DOCTYPE html><html></html>");
        assert_eq!(live.doctype(), Some("html"));
    }

    #[test]
    fn test_unknown_node_is_an_error() {
        let mut live = Document::new();
        let source = Document::new();
        let err = Morph
            .reconcile(&mut live, NodeId::try_new(99, 0).unwrap(), &source, source.root(), ReconcileOptions::full())
            .unwrap_err();
        assert!(matches!(err, Error::NodeNotFound { .. }));
    }

    mod proptest_morph {
        use super::*;
        use proptest::prelude::*;

        fn list_markup(ids: &[u8]) -> String {
            let items: String = ids
                .iter()
                .map(|id| format!(r#"<li id="i{id}">{id}</li>"#))
                .collect();
            format!("<ul>{items}</ul>")
        }

        proptest! {
            /// Any keyed list morphs into any other and surviving keys keep their node.
            #[test]
            fn morph_converges_on_keyed_lists(
                before in proptest::collection::btree_set(0u8..20, 0..10),
                after in proptest::collection::btree_set(0u8..20, 0..10),
                shuffle in any::<bool>(),
            ) {
                let before: Vec<u8> = before.into_iter().collect();
                let mut after: Vec<u8> = after.into_iter().collect();
                if shuffle {
                    after.reverse();
                }

                let mut live = Document::parse(&list_markup(&before)).unwrap();
                let kept: Vec<(String, NodeId)> = after
                    .iter()
                    .filter(|id| before.contains(id))
                    .map(|id| {
                        let key = format!("i{id}");
                        let node = live.by_id(&key).unwrap();
                        (key, node)
                    })
                    .collect();

                let source = Document::parse(&list_markup(&after)).unwrap();
                Morph.reconcile(&mut live, NodeId::ROOT, &source, source.root(), ReconcileOptions::full()).unwrap();

                prop_assert_eq!(live.to_html(), source.to_html());
                for (key, node) in kept {
                    prop_assert_eq!(live.by_id(&key), Some(node));
                }
            }
        }
    }
}
