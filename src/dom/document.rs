//! Arena-backed document tree.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

// ============================================================================
// Types
// ============================================================================

/// A document shared between the engine and its frames.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Element payload: name, ordered attributes and live control state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    /// User-entered value, `None` while the control shows its attribute.
    pub(crate) value: Option<String>,
    /// User-toggled checkedness, `None` while it follows the attribute.
    pub(crate) checked: Option<bool>,
}

impl ElementData {
    /// Creates an element with no attributes. The name is lowercased.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, Vec::new())
    }

    /// Creates an element with the given attributes, in order.
    #[must_use]
    pub fn with_attributes(name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attributes,
            value: None,
            checked: None,
        }
    }

    /// Returns the lowercase tag name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the tag name matches, ignoring ASCII case.
    #[inline]
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the attributes in source order.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if the attribute is present.
    #[inline]
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Removes an attribute.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes
            .retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    /// Replaces every attribute at once.
    pub(crate) fn replace_attributes(&mut self, attributes: Vec<(String, String)>) {
        self.attributes = attributes;
    }

    /// Returns the non-empty `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Returns `true` if the space-separated `class` attribute contains `class_name`.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    /// Current control value: user-entered state, else the `value` attribute.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().or_else(|| self.attr("value"))
    }

    /// Current checkedness: user state, else presence of `checked`.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or_else(|| self.has_attr("checked"))
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root.
    Document,
    /// An element.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment.
    Comment(String),
}

impl NodeData {
    /// Returns `true` if both payloads are the same kind of node and, for
    /// elements, carry the same tag name.
    #[must_use]
    pub fn same_kind(&self, other: &NodeData) -> bool {
        match (self, other) {
            (NodeData::Document, NodeData::Document)
            | (NodeData::Text(_), NodeData::Text(_))
            | (NodeData::Comment(_), NodeData::Comment(_)) => true,
            (NodeData::Element(a), NodeData::Element(b)) => a.name == b.name,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Arena slot. `node` is `None` once the slot has been collected.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

// ============================================================================
// Document
// ============================================================================

/// An HTML document stored as a node arena.
///
/// Detached nodes stay in the arena until [`collect_garbage`] frees every
/// slot unreachable from the root. Freed slots are reused under a bumped
/// generation, so a [`NodeId`] of a collected node resolves to nothing.
///
/// [`collect_garbage`]: Document::collect_garbage
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    doctype: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node {
                    parent: None,
                    children: Vec::new(),
                    data: NodeData::Document,
                }),
            }],
            free: Vec::new(),
            doctype: None,
        }
    }

    /// Parses markup into a new document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unterminated comments or tags.
    pub fn parse(markup: &str) -> Result<Self> {
        super::parser::parse(markup)
    }

    /// Wraps the document for sharing between tasks.
    #[must_use]
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    /// Returns the root node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the doctype name, if any.
    #[inline]
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Sets the doctype name.
    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// Number of arena slots: attached, detached or free.
    #[inline]
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    /// Frees every node unreachable from the root and returns how many
    /// were freed.
    ///
    /// Ids of connected nodes are unaffected. Ids of freed nodes stop
    /// resolving, even after their slot is reused.
    pub fn collect_garbage(&mut self) -> usize {
        let mut reachable = vec![false; self.slots.len()];
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            reachable[id.index()] = true;
            stack.extend_from_slice(self.children(id));
        }

        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if reachable[index] || slot.node.is_none() {
                continue;
            }
            slot.node = None;
            freed += 1;
            // an exhausted generation retires the slot for good
            if let Some(next) = slot.generation.checked_add(1) {
                slot.generation = next;
                self.free.push(index);
            }
        }
        freed
    }
}

// ============================================================================
// Document - Node Access
// ============================================================================

impl Document {
    fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| Error::node_not_found(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| Error::node_not_found(id))
    }

    /// Returns the payload of a node.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).ok().map(|node| &node.data)
    }

    /// Returns the element payload, if the node is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Returns the mutable element payload, if the node is an element.
    #[must_use]
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).ok().map(|node| &mut node.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|node| node.parent)
    }

    /// Returns the children of a node (empty for unknown ids).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the element children of a node.
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    /// Replaces the payload of a text or comment node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] for documents and elements.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        let node = self.node_mut(id)?;
        match &mut node.data {
            NodeData::Text(existing) | NodeData::Comment(existing) => {
                *existing = text.into();
                Ok(())
            }
            _ => Err(Error::invalid_node(id, "not a text or comment node")),
        }
    }

    /// Concatenated text of a node and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Document | NodeData::Element(_)) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
            Some(NodeData::Comment(_)) | None => {}
        }
    }
}

// ============================================================================
// Document - Node Creation
// ============================================================================

impl Document {
    /// Stores a detached node, reusing a freed slot when one is available.
    fn push_node(&mut self, data: NodeData) -> Result<NodeId> {
        let node = Node {
            parent: None,
            children: Vec::new(),
            data,
        };
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.node = Some(node);
            return NodeId::try_new(index, slot.generation);
        }

        let id = NodeId::try_new(self.slots.len(), 0)?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        Ok(id)
    }

    /// Creates a detached element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if the arena has run out of ids.
    pub fn create_element(&mut self, element: ElementData) -> Result<NodeId> {
        self.push_node(NodeData::Element(element))
    }

    /// Creates a detached text node.
    ///
    /// # Errors
    ///
    /// Same as [`create_element`](Self::create_element).
    pub fn create_text(&mut self, text: impl Into<String>) -> Result<NodeId> {
        self.push_node(NodeData::Text(text.into()))
    }

    /// Creates a detached comment node.
    ///
    /// # Errors
    ///
    /// Same as [`create_element`](Self::create_element).
    pub fn create_comment(&mut self, text: impl Into<String>) -> Result<NodeId> {
        self.push_node(NodeData::Comment(text.into()))
    }

    /// Deep-copies a node from another document into this one, detached.
    ///
    /// Control state is copied along with the markup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] when asked to import a document node;
    /// import its children instead.
    pub fn import(&mut self, source: &Document, node: NodeId) -> Result<NodeId> {
        let (data, children) = {
            let source_node = source.node(node)?;
            if matches!(source_node.data, NodeData::Document) {
                return Err(Error::invalid_node(node, "cannot import a document node"));
            }
            (source_node.data.clone(), source_node.children.clone())
        };

        let copy = self.push_node(data)?;
        for child in children {
            let child_copy = self.import(source, child)?;
            self.attach(copy, child_copy, None);
        }
        Ok(copy)
    }
}

// ============================================================================
// Document - Tree Mutation
// ============================================================================

impl Document {
    fn can_have_children(&self, id: NodeId) -> bool {
        matches!(
            self.data(id),
            Some(NodeData::Document | NodeData::Element(_))
        )
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if !self.can_have_children(parent) {
            return Err(Error::invalid_node(parent, "node cannot have children"));
        }
        if child == NodeId::ROOT {
            return Err(Error::invalid_node(child, "document node cannot be inserted"));
        }
        // parent must not be inside child's subtree
        if self.contains(child, parent) {
            return Err(Error::invalid_node(child, "insertion would create a cycle"));
        }
        Ok(())
    }

    /// Links `child` under `parent` at `index` (end when `None`). Assumes
    /// `child` is detached and the insertion was checked.
    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Ok(node) = self.node_mut(parent) {
            let children = &mut node.children;
            match index {
                Some(index) if index <= children.len() => children.insert(index, child),
                _ => children.push(child),
            }
        }
    }

    /// Unlinks a node from its parent. No-op for detached nodes.
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Ok(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Ok(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Appends `child` as the last child of `parent`, moving it if attached.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids, non-container parents and cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        self.unlink(child);
        self.attach(parent, child, None);
        Ok(())
    }

    /// Inserts `child` as the first child of `parent`.
    ///
    /// # Errors
    ///
    /// Same as [`append_child`](Self::append_child).
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        self.unlink(child);
        self.attach(parent, child, Some(0));
        Ok(())
    }

    /// Inserts `child` immediately before `reference` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        if child == reference {
            return Ok(());
        }
        self.check_insertion(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(Error::invalid_node(reference, "reference is not a direct child"));
        }
        self.unlink(child);
        let index = self.children(parent).iter().position(|c| *c == reference);
        self.attach(parent, child, index);
        Ok(())
    }

    /// Inserts `child` immediately after `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `target` is detached.
    pub fn insert_after(&mut self, target: NodeId, child: NodeId) -> Result<()> {
        let parent = self
            .parent(target)
            .ok_or_else(|| Error::invalid_node(target, "target is detached"))?;
        self.check_insertion(parent, child)?;
        self.unlink(child);
        let index = self
            .children(parent)
            .iter()
            .position(|c| *c == target)
            .map(|pos| pos + 1);
        self.attach(parent, child, index);
        Ok(())
    }

    /// Detaches a node (and its subtree) from the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] for the document root.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        if id == NodeId::ROOT {
            return Err(Error::invalid_node(id, "cannot remove the document node"));
        }
        self.unlink(id);
        Ok(())
    }

    /// Puts `replacement` where `target` is and detaches `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `target` is detached.
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) -> Result<()> {
        let parent = self
            .parent(target)
            .ok_or_else(|| Error::invalid_node(target, "target is detached"))?;
        if replacement == target {
            return Ok(());
        }
        self.insert_before(parent, replacement, target)?;
        self.unlink(target);
        Ok(())
    }

    /// Detaches every child of a node.
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            if let Ok(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
        Ok(())
    }

    /// Sets the exact child list of `parent`.
    ///
    /// Previous children missing from `children` are detached; new ones are
    /// moved from wherever they were.
    pub(crate) fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) -> Result<()> {
        for child in &children {
            self.check_insertion(parent, *child)?;
        }
        self.clear_children(parent)?;
        for child in children {
            self.unlink(child);
            self.attach(parent, child, None);
        }
        Ok(())
    }
}

// ============================================================================
// Document - Control State
// ============================================================================

impl Document {
    /// Sets the live value of a form control, as typing would.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if the node is not an element.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::invalid_node(id, "value target is not an element"))?;
        element.value = Some(value.into());
        Ok(())
    }

    /// Sets the live checkedness of a checkbox or radio button.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if the node is not an element.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::invalid_node(id, "checked target is not an element"))?;
        element.checked = Some(checked);
        Ok(())
    }
}

// ============================================================================
// Document - Traversal
// ============================================================================

impl Document {
    /// Returns `true` if `node` is `ancestor` or lies inside its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Returns `true` if the node is attached to the document root.
    #[inline]
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Elements below `root` in document order, `root` excluded.
    #[must_use]
    pub fn descendant_elements(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Connected elements with the given tag name, in document order.
    #[must_use]
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.descendant_elements(NodeId::ROOT)
            .into_iter()
            .filter(|node| self.element(*node).is_some_and(|e| e.is(name)))
            .collect()
    }

    /// First connected element whose `id` attribute equals `id`.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendant_elements(NodeId::ROOT)
            .into_iter()
            .find(|node| self.element(*node).and_then(ElementData::id) == Some(id))
    }

    /// Nearest element, starting at `node` itself, that satisfies `predicate`.
    #[must_use]
    pub fn closest<F>(&self, node: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.element(current).is_some_and(&predicate) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Nearest element, starting at `node`, with the given tag name.
    #[must_use]
    pub fn closest_named(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.closest(node, |element| element.is(name))
    }

    /// The `<html>` element.
    #[must_use]
    pub fn html_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT)
            .into_iter()
            .find(|node| self.element(*node).is_some_and(|e| e.is("html")))
    }

    /// The `<head>` element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.elements_named("head").into_iter().next()
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.elements_named("body").into_iter().next()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn element(doc: &mut Document, name: &str, id: Option<&str>) -> NodeId {
        let mut data = ElementData::new(name);
        if let Some(id) = id {
            data.set_attr("id", id);
        }
        doc.create_element(data).unwrap()
    }

    #[test]
    fn test_append_and_lookup_by_id() {
        let mut doc = Document::new();
        let div = element(&mut doc, "div", Some("x"));
        doc.append_child(doc.root(), div).unwrap();

        assert_eq!(doc.by_id("x"), Some(div));
        assert!(doc.is_connected(div));
    }

    #[test]
    fn test_detached_nodes_are_not_found_by_id() {
        let mut doc = Document::new();
        let div = element(&mut doc, "div", Some("x"));
        doc.append_child(doc.root(), div).unwrap();
        doc.remove(div).unwrap();

        assert_eq!(doc.by_id("x"), None);
        assert!(!doc.is_connected(div));
        assert!(doc.element(div).is_some());
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut doc = Document::new();
        let parent = element(&mut doc, "ul", None);
        let a = element(&mut doc, "li", Some("a"));
        let b = element(&mut doc, "li", Some("b"));
        let c = element(&mut doc, "li", Some("c"));
        doc.append_child(doc.root(), parent).unwrap();
        doc.append_child(parent, b).unwrap();
        doc.insert_before(parent, a, b).unwrap();
        doc.insert_after(b, c).unwrap();

        assert_eq!(doc.children(parent), &[a, b, c]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut doc = Document::new();
        let outer = element(&mut doc, "div", None);
        let inner = element(&mut doc, "div", None);
        doc.append_child(doc.root(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();

        let err = doc.append_child(inner, outer).unwrap_err();
        assert!(matches!(err, Error::InvalidNode { .. }));
    }

    #[test]
    fn test_text_nodes_cannot_have_children() {
        let mut doc = Document::new();
        let text = doc.create_text("hi").unwrap();
        let div = element(&mut doc, "div", None);
        assert!(doc.append_child(text, div).is_err());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut doc = Document::new();
        assert!(doc.remove(NodeId::ROOT).is_err());
    }

    #[test]
    fn test_import_copies_subtree() {
        let source = Document::parse(r#"<p id="p">Hello <b>you</b></p>"#).unwrap();
        let p = source.by_id("p").unwrap();

        let mut doc = Document::new();
        let copy = doc.import(&source, p).unwrap();
        doc.append_child(doc.root(), copy).unwrap();

        assert_eq!(doc.text_content(copy), "Hello you");
        assert_ne!(doc.by_id("p"), None);
    }

    #[test]
    fn test_closest_walks_up_from_self() {
        let doc = Document::parse(r#"<a href="/x"><span id="s">go</span></a>"#).unwrap();
        let span = doc.by_id("s").unwrap();
        let link = doc.closest_named(span, "a").unwrap();

        assert_eq!(doc.element(link).unwrap().attr("href"), Some("/x"));
        assert_eq!(doc.closest_named(link, "a"), Some(link));
    }

    #[test]
    fn test_control_state_overrides_attributes() {
        let mut doc = Document::parse(r#"<input id="q" value="a"><input id="c" type="checkbox">"#).unwrap();
        let q = doc.by_id("q").unwrap();
        let c = doc.by_id("c").unwrap();

        doc.set_value(q, "typed").unwrap();
        doc.set_checked(c, true).unwrap();

        assert_eq!(doc.element(q).unwrap().value(), Some("typed"));
        assert_eq!(doc.element(q).unwrap().attr("value"), Some("a"));
        assert!(doc.element(c).unwrap().is_checked());
    }

    #[test]
    fn test_collect_garbage_frees_detached_subtrees() {
        let mut doc = Document::parse(r#"<div id="keep"></div><ul id="gone"><li>a</li><li>b</li></ul>"#).unwrap();
        let keep = doc.by_id("keep").unwrap();
        let gone = doc.by_id("gone").unwrap();
        let before = doc.arena_len();
        doc.remove(gone).unwrap();

        assert_eq!(doc.collect_garbage(), 5);
        assert_eq!(doc.by_id("keep"), Some(keep));
        assert!(doc.element(gone).is_none());
        assert!(doc.remove(gone).unwrap_err().is_document_error());

        for _ in 0..5 {
            let node = element(&mut doc, "p", None);
            doc.append_child(keep, node).unwrap();
        }
        assert_eq!(doc.arena_len(), before);
        assert_eq!(doc.collect_garbage(), 0);
    }

    #[test]
    fn test_stale_id_does_not_resolve_to_reused_slot() {
        let mut doc = Document::new();
        let old = element(&mut doc, "div", Some("old"));
        doc.collect_garbage();

        let new = element(&mut doc, "span", Some("new"));
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(doc.element(old).is_none());
        assert!(doc.append_child(doc.root(), old).is_err());
        assert!(doc.element(new).is_some_and(|e| e.is("span")));
    }

    #[test]
    fn test_body_and_html_lookup() {
        let doc = Document::parse("<html><head></head><body><p>x</p></body></html>").unwrap();
        let html = doc.html_element().unwrap();
        let body = doc.body().unwrap();
        assert_eq!(doc.parent(body), Some(html));
        assert!(doc.head().is_some());
    }
}
