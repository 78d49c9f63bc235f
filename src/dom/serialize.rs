//! Markup serialization.

use crate::identifiers::NodeId;

use super::document::{Document, NodeData};
use super::parser::{is_raw_text, is_void};

impl Document {
    /// Serializes the whole document, doctype included.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = self.doctype() {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
        for child in self.children(self.root()) {
            self.write_node(*child, false, &mut out);
        }
        out
    }

    /// Serializes a node including its own tag.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let raw = self.parent(node).is_some_and(|parent| self.is_raw_text_parent(parent));
        self.write_node(node, raw, &mut out);
        out
    }

    /// Serializes the children of a node.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let raw = self.is_raw_text_parent(node);
        for child in self.children(node) {
            self.write_node(*child, raw, &mut out);
        }
        out
    }

    fn is_raw_text_parent(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| is_raw_text(e.name()))
    }

    fn write_node(&self, node: NodeId, raw_text: bool, out: &mut String) {
        match self.data(node) {
            Some(NodeData::Document) => {
                for child in self.children(node) {
                    self.write_node(*child, false, out);
                }
            }
            Some(NodeData::Text(text)) if raw_text => out.push_str(text),
            Some(NodeData::Text(text)) => escape_text(text, out),
            Some(NodeData::Comment(text)) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Some(NodeData::Element(element)) => {
                out.push('<');
                out.push_str(element.name());
                for (name, value) in element.attributes() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void(element.name()) {
                    return;
                }
                let raw = is_raw_text(element.name());
                for child in self.children(node) {
                    self.write_node(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(element.name());
                out.push('>');
            }
            None => {}
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
