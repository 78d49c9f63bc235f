//! Tolerant HTML parser.
//!
//! Handles the markup a server-rendered page actually sends: doctype,
//! comments, void elements, raw-text elements and the common character
//! references. Stray end tags are ignored and unclosed elements are closed
//! at end of input.

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::document::{Document, ElementData, NodeData};

// ============================================================================
// Constants
// ============================================================================

/// Elements that never have children or an end tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is not markup and is not entity-decoded.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose content is not markup but is entity-decoded.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Elements implicitly closed by an opening tag of the same name.
const SELF_NESTING_CLOSERS: &[&str] = &["li", "option", "p"];

#[inline]
pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

#[inline]
pub(crate) fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

// ============================================================================
// Entry Point
// ============================================================================

/// Parses markup into a [`Document`].
pub(crate) fn parse(markup: &str) -> Result<Document> {
    let mut parser = Parser {
        input: markup,
        lower: markup.to_ascii_lowercase(),
        pos: 0,
        doc: Document::new(),
        stack: vec![NodeId::ROOT],
    };
    parser.run()?;
    Ok(parser.doc)
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    input: &'a str,
    /// ASCII-lowercased copy of `input` with identical byte offsets.
    lower: String,
    pos: usize,
    doc: Document,
    stack: Vec<NodeId>,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<()> {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if rest.starts_with("<!--") {
                self.comment()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.declaration()?;
            } else if rest.starts_with("</") && next_is_letter(&rest[2..]) {
                self.end_tag()?;
            } else if rest.starts_with('<') && next_is_letter(&rest[1..]) {
                self.start_tag()?;
            } else {
                self.text()?;
            }
        }
        Ok(())
    }

    #[inline]
    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn find_from(&self, needle: &str, from: usize) -> Option<usize> {
        self.lower[from..].find(needle).map(|offset| from + offset)
    }

    fn comment(&mut self) -> Result<()> {
        let start = self.pos + 4;
        let end = self
            .find_from("-->", start)
            .ok_or_else(|| Error::parse(format!("unterminated comment at byte {}", self.pos)))?;
        let comment = self.doc.create_comment(&self.input[start..end])?;
        let parent = self.current();
        self.doc.append_child(parent, comment)?;
        self.pos = end + 3;
        Ok(())
    }

    fn declaration(&mut self) -> Result<()> {
        let end = self
            .find_from(">", self.pos)
            .ok_or_else(|| Error::parse(format!("unterminated declaration at byte {}", self.pos)))?;
        let body = &self.input[self.pos + 2..end];
        if self.lower[self.pos..].starts_with("<!doctype") {
            let name = body["doctype".len()..].trim();
            self.doc.set_doctype(Some(name.to_string()));
        }
        self.pos = end + 1;
        Ok(())
    }

    fn end_tag(&mut self) -> Result<()> {
        let end = self
            .find_from(">", self.pos)
            .ok_or_else(|| Error::parse(format!("unterminated end tag at byte {}", self.pos)))?;
        let name = self.lower[self.pos + 2..end].trim().to_string();
        self.pos = end + 1;
        self.close(&name);
        Ok(())
    }

    /// Pops open elements up to and including the nearest `name`. Stray end
    /// tags leave the stack untouched.
    fn close(&mut self, name: &str) {
        let position = self
            .stack
            .iter()
            .rposition(|node| self.doc.element(*node).is_some_and(|e| e.is(name)));
        if let Some(position) = position {
            self.stack.truncate(position.max(1));
        }
    }

    fn start_tag(&mut self) -> Result<()> {
        let tag_start = self.pos;
        self.pos += 1;
        let name = self.read_while(|c| !c.is_ascii_whitespace() && c != '/' && c != '>');
        let name = name.to_ascii_lowercase();

        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Err(Error::parse(format!("unterminated <{name}> at byte {tag_start}")));
            };
            match c {
                '>' => {
                    self.pos += 1;
                    break;
                }
                '/' => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                _ => {
                    let (key, value) = self.attribute(&name, tag_start)?;
                    if !key.is_empty() && !attributes.iter().any(|(existing, _)| *existing == key) {
                        attributes.push((key, value));
                    }
                }
            }
        }

        if SELF_NESTING_CLOSERS.contains(&name.as_str()) {
            let top = self.current();
            if self.doc.element(top).is_some_and(|e| e.is(&name)) {
                self.stack.pop();
            }
        }

        let element = self
            .doc
            .create_element(ElementData::with_attributes(name.clone(), attributes))?;
        let parent = self.current();
        self.doc.append_child(parent, element)?;

        if is_void(&name) || self_closing {
            return Ok(());
        }

        if is_raw_text(&name) || ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            let close = format!("</{name}");
            let content_end = self.find_from(&close, self.pos).unwrap_or(self.input.len());
            let raw = &self.input[self.pos..content_end];
            if !raw.is_empty() {
                let text = if is_raw_text(&name) {
                    raw.to_string()
                } else {
                    decode_entities(raw)
                };
                let text = self.doc.create_text(text)?;
                self.doc.append_child(element, text)?;
            }
            self.pos = match self.find_from(">", content_end) {
                Some(gt) => gt + 1,
                None => self.input.len(),
            };
            return Ok(());
        }

        self.stack.push(element);
        Ok(())
    }

    fn attribute(&mut self, tag: &str, tag_start: usize) -> Result<(String, String)> {
        let key = self
            .read_while(|c| !c.is_ascii_whitespace() && c != '=' && c != '>' && c != '/')
            .to_ascii_lowercase();
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok((key, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.pos + 1;
                let end = self.input[start..]
                    .find(quote)
                    .map(|offset| start + offset)
                    .ok_or_else(|| {
                        Error::parse(format!("unterminated attribute in <{tag}> at byte {tag_start}"))
                    })?;
                self.pos = end + 1;
                &self.input[start..end]
            }
            _ => self.read_while(|c| !c.is_ascii_whitespace() && c != '>'),
        };
        Ok((key, decode_entities(value)))
    }

    fn text(&mut self) -> Result<()> {
        // a '<' that reached here does not open a tag and is literal text;
        // step over one whole char so the slice stays on a boundary
        let search_from = self.pos + self.peek().map_or(1, char::len_utf8);
        let end = self.input[search_from..]
            .find('<')
            .map(|offset| search_from + offset)
            .unwrap_or(self.input.len());
        let text = decode_entities(&self.input[self.pos..end]);
        self.pos = end;
        self.append_text(text)
    }

    fn append_text(&mut self, text: String) -> Result<()> {
        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last()
            && let Some(NodeData::Text(existing)) = self.doc.data(last)
        {
            let merged = format!("{existing}{text}");
            return self.doc.set_text(last, merged);
        }
        let node = self.doc.create_text(text)?;
        self.doc.append_child(parent, node)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        self.read_while(|c| c.is_ascii_whitespace());
    }

    fn read_while<F>(&mut self, predicate: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        let len = self.input[start..]
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map(|(offset, _)| offset)
            .unwrap_or(self.input.len() - start);
        self.pos = start + len;
        &self.input[start..start + len]
    }
}

#[inline]
fn next_is_letter(rest: &str) -> bool {
    rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

// ============================================================================
// Character References
// ============================================================================

/// Decodes the named and numeric character references HTML pages commonly
/// use. Unknown references are left as written.
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .get(1..)
            .and_then(|tail| tail.find(';').filter(|semi| *semi <= 10).map(|semi| (tail, semi)))
            .and_then(|(tail, semi)| decode_reference(&tail[..semi]).map(|c| (c, semi + 2)));

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
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
    fn test_parse_nested_elements() {
        let doc = parse(r#"<div id="a"><p class="x">Hi <b>there</b></p></div>"#).unwrap();
        let a = doc.by_id("a").unwrap();
        let p = doc.children(a)[0];

        assert!(doc.element(p).unwrap().is("p"));
        assert!(doc.element(p).unwrap().has_class("x"));
        assert_eq!(doc.text_content(a), "Hi there");
    }

    #[test]
    fn test_parse_doctype_and_comment() {
        let doc = parse("<!DOCTYPE html><!-- note --><html></html>").unwrap();
        assert_eq!(doc.doctype(), Some("html"));
        let first = doc.children(doc.root())[0];
        assert_eq!(doc.data(first), Some(&NodeData::Comment(" note ".to_string())));
    }

    #[test]
    fn test_unterminated_comment_is_an_error() {
        let err = parse("<div><!-- oops").unwrap_err();
        assert!(err.is_markup_error());
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let doc = parse(r#"<form id="f"><input name="a"><input name="b"></form>"#).unwrap();
        let form = doc.by_id("f").unwrap();
        assert_eq!(doc.children(form).len(), 2);
    }

    #[test]
    fn test_raw_text_is_not_parsed() {
        let doc = parse("<script>if (a < b && c) { x = '<p>'; }</script>").unwrap();
        let script = doc.elements_named("script")[0];
        assert_eq!(doc.text_content(script), "if (a < b && c) { x = '<p>'; }");
    }

    #[test]
    fn test_textarea_content_is_decoded() {
        let doc = parse("<textarea>a &amp; b</textarea>").unwrap();
        let textarea = doc.elements_named("textarea")[0];
        assert_eq!(doc.text_content(textarea), "a & b");
    }

    #[test]
    fn test_attributes() {
        let doc = parse(r#"<input id=q disabled value='a &quot;b&quot;' id="dup">"#).unwrap();
        let q = doc.by_id("q").unwrap();
        let element = doc.element(q).unwrap();

        assert_eq!(element.attr("disabled"), Some(""));
        assert_eq!(element.attr("value"), Some("a \"b\""));
        assert_eq!(element.attributes().len(), 3);
    }

    #[test]
    fn test_stray_end_tags_are_ignored() {
        let doc = parse(r#"<div id="a"></span>text</div>"#).unwrap();
        let a = doc.by_id("a").unwrap();
        assert_eq!(doc.text_content(a), "text");
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let doc = parse(r#"<div id="a"><p>one<p>two"#).unwrap();
        let a = doc.by_id("a").unwrap();
        assert_eq!(doc.children(a).len(), 2);
    }

    #[test]
    fn test_literal_less_than_is_text() {
        let doc = parse("<p>1 < 2</p>").unwrap();
        let p = doc.elements_named("p")[0];
        assert_eq!(doc.text_content(p), "1 < 2");
    }

    #[test]
    fn test_non_ascii_text() {
        let doc = parse("<p>école</p><p>ü</p>日本<b>x</b>").unwrap();
        let paragraphs = doc.elements_named("p");
        assert_eq!(doc.text_content(paragraphs[0]), "école");
        assert_eq!(doc.text_content(paragraphs[1]), "ü");
        assert_eq!(doc.text_content(doc.root()), "écoleü日本x");
    }

    #[test]
    fn test_non_ascii_after_literal_less_than() {
        let doc = parse("<p>a <é</p>").unwrap();
        let p = doc.elements_named("p")[0];
        assert_eq!(doc.text_content(p), "a <é");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;b&gt; &#65;&#x42; &bogus; &"), "<b> AB &bogus; &");
    }

    #[test]
    fn test_template_children_are_parsed() {
        let doc = parse(r#"<template id="t"><li id="x">X</li></template>"#).unwrap();
        let t = doc.by_id("t").unwrap();
        assert_eq!(doc.children(t).len(), 1);
    }

    mod proptest_parse {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any mix of markup fragments and multi-byte text parses or
            /// fails with an error, never a panic.
            #[test]
            fn parse_never_panics(
                parts in proptest::collection::vec(
                    prop_oneof![
                        Just("<p>"), Just("</p>"), Just("<"), Just("<!--"), Just("-->"),
                        Just("é"), Just("日本"), Just("ü<"), Just("&amp;"), Just("a"), Just(" "),
                    ],
                    0..24,
                ),
            ) {
                let _ = parse(&parts.concat());
            }

            /// Text without markup characters survives parsing unchanged.
            #[test]
            fn plain_text_is_preserved(text in "[^<&]{1,32}") {
                let doc = parse(&text).unwrap();
                prop_assert_eq!(doc.text_content(doc.root()), text);
            }
        }
    }
}
