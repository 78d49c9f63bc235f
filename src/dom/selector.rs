//! CSS selector lists.
//!
//! Supports the subset stream targets are written in:
//!
//! | Kind | Syntax |
//! |------|--------|
//! | Simple | `div`, `*`, `#id`, `.class`, `[attr]`, `[attr=v]`, `~=` `^=` `$=` `*=` |
//! | Structural | `:first-child`, `:last-child`, `:only-child`, `:empty` |
//! | Positional | `:nth-child(an+b)`, `:nth-last-child(an+b)`, `odd`, `even` |
//! | Negation | `:not(<selector list>)` |
//! | Combinators | descendant, `>`, `+`, `~` |
//!
//! Malformed input is rejected with [`Error::InvalidSelector`]. Well-formed
//! selectors using anything else (`:hover`, `::before`) fail with
//! [`Error::UnsupportedSelector`] instead of silently matching nothing.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::document::{Document, ElementData, NodeData};

// ============================================================================
// Types
// ============================================================================

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

/// Compounds left to right; `combinators[i]` joins `compounds[i]` and
/// `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeCondition>,
    pseudo_classes: Vec<PseudoClass>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    NthChild(Nth),
    NthLastChild(Nth),
    Not(Vec<ComplexSelector>),
}

/// `an+b`: matches the 1-based positions `a*n + b` for some `n >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Nth {
    a: i32,
    b: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeCondition {
    name: String,
    test: Option<(AttributeOperator, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOperator {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

// ============================================================================
// SelectorList
// ============================================================================

impl SelectorList {
    /// Parses a selector list.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSelector`] for empty groups, unbalanced brackets or
    ///   malformed pseudo-class arguments
    /// - [`Error::UnsupportedSelector`] for pseudo-elements and unknown
    ///   pseudo-classes
    pub fn parse(source: &str) -> Result<Self> {
        let groups = split_groups(source)?;
        let selectors = groups
            .into_iter()
            .map(|group| parse_complex(source, group))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: source.to_string(),
            selectors,
        })
    }

    /// Returns the source text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the element matches any selector in the list.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.element(node).is_some()
            && self
                .selectors
                .iter()
                .any(|selector| selector.matches(doc, node, selector.compounds.len() - 1))
    }
}

impl FromStr for SelectorList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Document Integration
// ============================================================================

impl Document {
    /// Connected elements matching `selectors`, in document order.
    #[must_use]
    pub fn select(&self, selectors: &SelectorList) -> Vec<NodeId> {
        self.select_within(self.root(), selectors)
    }

    /// Elements below `root` matching `selectors`, in document order.
    #[must_use]
    pub fn select_within(&self, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendant_elements(root)
            .into_iter()
            .filter(|node| selectors.matches(self, *node))
            .collect()
    }

    /// Parses `selector` and returns every connected match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if the selector does not parse.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selectors = SelectorList::parse(selector)?;
        Ok(self.select(&selectors))
    }

    /// Parses `selector` and returns the first connected match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if the selector does not parse.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }
}

// ============================================================================
// Matching
// ============================================================================

impl ComplexSelector {
    fn matches(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|parent| self.matches(doc, parent, index - 1)),
            Combinator::Descendant => {
                let mut cursor = doc.parent(node);
                while let Some(ancestor) = cursor {
                    if self.matches(doc, ancestor, index - 1) {
                        return true;
                    }
                    cursor = doc.parent(ancestor);
                }
                false
            }
            Combinator::NextSibling => preceding_siblings(doc, node)
                .first()
                .is_some_and(|sibling| self.matches(doc, *sibling, index - 1)),
            Combinator::SubsequentSibling => preceding_siblings(doc, node)
                .into_iter()
                .any(|sibling| self.matches(doc, sibling, index - 1)),
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(element) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag
            && !element.is(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.attr("id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self.attributes.iter().all(|condition| condition.matches(element))
            && self.pseudo_classes.iter().all(|pseudo| pseudo.matches(doc, node))
    }
}

impl PseudoClass {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let position = || sibling_position(doc, node);
        match self {
            PseudoClass::FirstChild => position().is_some_and(|(index, _)| index == 0),
            PseudoClass::LastChild => position().is_some_and(|(index, count)| index + 1 == count),
            PseudoClass::OnlyChild => position().is_some_and(|(_, count)| count == 1),
            PseudoClass::Empty => doc.children(node).iter().all(|child| match doc.data(*child) {
                Some(NodeData::Text(text)) => text.is_empty(),
                Some(NodeData::Comment(_)) => true,
                _ => false,
            }),
            PseudoClass::NthChild(nth) => position().is_some_and(|(index, _)| nth.matches(index + 1)),
            PseudoClass::NthLastChild(nth) => {
                position().is_some_and(|(index, count)| nth.matches(count - index))
            }
            PseudoClass::Not(selectors) => !selectors
                .iter()
                .any(|selector| selector.matches(doc, node, selector.compounds.len() - 1)),
        }
    }
}

impl Nth {
    const ODD: Nth = Nth { a: 2, b: 1 };
    const EVEN: Nth = Nth { a: 2, b: 0 };

    /// Parses `odd`, `even`, `b`, `an` or `an+b`, ignoring whitespace.
    fn parse(argument: &str) -> Option<Nth> {
        let compact: String = argument
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "odd" => return Some(Nth::ODD),
            "even" => return Some(Nth::EVEN),
            _ => {}
        }

        let Some((a, b)) = compact.split_once('n') else {
            return compact.parse().ok().map(|b| Nth { a: 0, b });
        };
        let a = match a {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let b = match b {
            "" => 0,
            b if b.starts_with(['+', '-']) => b.parse().ok()?,
            _ => return None,
        };
        Some(Nth { a, b })
    }

    fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        if a == 0 {
            return position == b;
        }
        let offset = position - b;
        offset % a == 0 && offset / a >= 0
    }
}

/// Index of `node` among its parent's element children, and their count.
fn sibling_position(doc: &Document, node: NodeId) -> Option<(usize, usize)> {
    let siblings = doc.element_children(doc.parent(node)?);
    let index = siblings.iter().position(|sibling| *sibling == node)?;
    Some((index, siblings.len()))
}

/// Element siblings before `node`, nearest first.
fn preceding_siblings(doc: &Document, node: NodeId) -> Vec<NodeId> {
    let Some(parent) = doc.parent(node) else {
        return Vec::new();
    };
    let siblings = doc.element_children(parent);
    let index = siblings
        .iter()
        .position(|sibling| *sibling == node)
        .unwrap_or(0);
    siblings[..index].iter().rev().copied().collect()
}

impl AttributeCondition {
    fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };
        let Some((operator, expected)) = &self.test else {
            return true;
        };
        match operator {
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Includes => actual.split_ascii_whitespace().any(|w| w == expected),
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(expected.as_str()),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(expected.as_str()),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(expected.as_str()),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Splits on commas outside brackets, parentheses and quotes.
fn split_groups(source: &str) -> Result<Vec<&str>> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (index, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::invalid_selector(source, format!("unbalanced '{c}'")))?;
            }
            (None, ',') if depth == 0 => {
                groups.push(source[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() || depth != 0 {
        return Err(Error::invalid_selector(source, "unterminated bracket or string"));
    }
    groups.push(source[start..].trim());

    if groups.iter().any(|group| group.is_empty()) {
        return Err(Error::invalid_selector(source, "empty selector"));
    }
    Ok(groups)
}

fn parse_complex(source: &str, group: &str) -> Result<ComplexSelector> {
    let mut cursor = Cursor { source, rest: group };
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        let had_space = cursor.skip_whitespace();
        let Some(c) = cursor.peek() else {
            break;
        };
        match c {
            '>' | '+' | '~' => {
                if compounds.is_empty() || pending.is_some() {
                    return Err(Error::invalid_selector(source, format!("misplaced '{c}'")));
                }
                cursor.bump();
                pending = Some(match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                });
            }
            _ => {
                if !compounds.is_empty() {
                    let combinator = match pending.take() {
                        Some(combinator) => combinator,
                        None if had_space => Combinator::Descendant,
                        None => return Err(Error::invalid_selector(source, "unexpected character")),
                    };
                    combinators.push(combinator);
                }
                compounds.push(cursor.compound()?);
            }
        }
    }

    if pending.is_some() {
        return Err(Error::invalid_selector(source, "dangling combinator"));
    }
    if compounds.is_empty() {
        return Err(Error::invalid_selector(source, "empty selector"));
    }
    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

struct Cursor<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let trimmed = self.rest.trim_start();
        let skipped = trimmed.len() != self.rest.len();
        self.rest = trimmed;
        skipped
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::invalid_selector(self.source, message)
    }

    fn unsupported(&self, message: impl Into<String>) -> Error {
        Error::unsupported_selector(self.source, message)
    }

    fn ident(&mut self) -> Result<String> {
        let len = self
            .rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
            .map(|(index, _)| index)
            .unwrap_or(self.rest.len());
        if len == 0 {
            return Err(self.error("expected an identifier"));
        }
        let ident = self.rest[..len].to_string();
        self.rest = &self.rest[len..];
        Ok(ident)
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut empty = true;

        match self.peek() {
            Some('*') => {
                self.bump();
                empty = false;
            }
            Some(c) if c.is_alphabetic() => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                empty = false;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                Some(':') => {
                    self.bump();
                    compound.pseudo_classes.push(self.pseudo_class()?);
                }
                _ => break,
            }
            empty = false;
        }

        if empty {
            return Err(self.error("unexpected character"));
        }
        Ok(compound)
    }

    fn pseudo_class(&mut self) -> Result<PseudoClass> {
        if self.peek() == Some(':') {
            return Err(self.unsupported("pseudo-elements are not supported"));
        }
        let name = self.ident()?.to_ascii_lowercase();
        let argument = if self.peek() == Some('(') {
            self.bump();
            Some(self.argument()?)
        } else {
            None
        };

        match (name.as_str(), argument) {
            ("first-child", None) => Ok(PseudoClass::FirstChild),
            ("last-child", None) => Ok(PseudoClass::LastChild),
            ("only-child", None) => Ok(PseudoClass::OnlyChild),
            ("empty", None) => Ok(PseudoClass::Empty),
            ("nth-child", Some(argument)) => self.nth(argument).map(PseudoClass::NthChild),
            ("nth-last-child", Some(argument)) => self.nth(argument).map(PseudoClass::NthLastChild),
            ("not", Some(argument)) => {
                let selectors = split_groups(argument)?
                    .into_iter()
                    .map(|group| parse_complex(self.source, group))
                    .collect::<Result<Vec<_>>>()?;
                Ok(PseudoClass::Not(selectors))
            }
            ("first-child" | "last-child" | "only-child" | "empty", Some(_)) => {
                Err(self.error(format!(":{name} takes no argument")))
            }
            ("nth-child" | "nth-last-child" | "not", None) => {
                Err(self.error(format!(":{name} needs an argument")))
            }
            _ => Err(self.unsupported(format!("unsupported pseudo-class ':{name}'"))),
        }
    }

    /// Reads up to the ')' closing an argument that was just opened and
    /// consumes it.
    fn argument(&mut self) -> Result<&'a str> {
        let rest = self.rest;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        for (index, c) in rest.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') if depth == 0 => {
                    self.rest = &rest[index + 1..];
                    return Ok(&rest[..index]);
                }
                (None, ')') => depth -= 1,
                _ => {}
            }
        }
        Err(self.error("unterminated pseudo-class argument"))
    }

    fn nth(&self, argument: &str) -> Result<Nth> {
        Nth::parse(argument).ok_or_else(|| self.error(format!("malformed an+b argument '{argument}'")))
    }

    fn attribute(&mut self) -> Result<AttributeCondition> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match self.bump() {
            Some(']') => return Ok(AttributeCondition { name, test: None }),
            Some('=') => AttributeOperator::Equals,
            Some(op @ ('~' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    return Err(self.error("expected '=' in attribute selector"));
                }
                match op {
                    '~' => AttributeOperator::Includes,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                }
            }
            _ => return Err(self.error("malformed attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let end = self
                    .rest
                    .find(quote)
                    .ok_or_else(|| self.error("unterminated string"))?;
                let value = self.rest[..end].to_string();
                self.rest = &self.rest[end + 1..];
                value
            }
            _ => self.ident()?,
        };

        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(AttributeCondition {
            name,
            test: Some((operator, value)),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(doc: &Document, nodes: Vec<NodeId>) -> Vec<String> {
        nodes
            .into_iter()
            .filter_map(|node| doc.element(node).and_then(|e| e.id()).map(str::to_string))
            .collect()
    }

    fn fixture() -> Document {
        Document::parse(
            r#"<ul id="list" class="items">
                 <li id="a" class="item done" data-kind="x-1">A</li>
                 <li id="b" class="item">B<span id="s" class="item"></span></li>
               </ul>
               <div id="other"><li id="c" class="item"></li></div>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_class_selector() {
        let doc = fixture();
        let found = doc.query_selector_all(".item").unwrap();
        assert_eq!(ids(&doc, found), ["a", "b", "s", "c"]);
    }

    #[test]
    fn test_compound_selector() {
        let doc = fixture();
        let found = doc.query_selector_all("li.item.done").unwrap();
        assert_eq!(ids(&doc, found), ["a"]);
    }

    #[test]
    fn test_child_and_descendant_combinators() {
        let doc = fixture();
        assert_eq!(ids(&doc, doc.query_selector_all("#list > .item").unwrap()), ["a", "b"]);
        assert_eq!(ids(&doc, doc.query_selector_all("#list .item").unwrap()), ["a", "b", "s"]);
    }

    #[test]
    fn test_groups_keep_document_order() {
        let doc = fixture();
        let found = doc.query_selector_all("#c, #a").unwrap();
        assert_eq!(ids(&doc, found), ["a", "c"]);
    }

    #[test]
    fn test_attribute_operators() {
        let doc = fixture();
        assert_eq!(ids(&doc, doc.query_selector_all("[data-kind]").unwrap()), ["a"]);
        assert_eq!(ids(&doc, doc.query_selector_all(r#"[data-kind="x-1"]"#).unwrap()), ["a"]);
        assert_eq!(ids(&doc, doc.query_selector_all("[data-kind^=x]").unwrap()), ["a"]);
        assert_eq!(ids(&doc, doc.query_selector_all("[class~=done]").unwrap()), ["a"]);
        assert!(doc.query_selector_all("[data-kind$=y]").unwrap().is_empty());
    }

    fn numbered() -> Document {
        Document::parse(
            r#"<ol><li id="n1"></li><li id="n2"></li><li id="n3"></li><li id="n4"></li><li id="n5"></li><li id="n6"></li></ol>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_malformed_syntax_is_rejected() {
        let malformed = [
            "", "a,,b", "[x", "> a", "a >", "li + + li", "li > ~ li", ":nth-child(x)", ":nth-child(2n1)",
            ":not()", ":first-child(2)", ":nth-child", "li:nth-child(2n+1", "a)",
        ];
        for selector in malformed {
            let err = SelectorList::parse(selector).unwrap_err();
            assert!(matches!(err, Error::InvalidSelector { .. }), "{selector}");
        }
    }

    #[test]
    fn test_unsupported_pseudo_classes_are_reported_separately() {
        for selector in ["a:hover", "p::before", "li:has(a)", "li:not(a:focus)"] {
            let err = SelectorList::parse(selector).unwrap_err();
            assert!(matches!(err, Error::UnsupportedSelector { .. }), "{selector}");
        }
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let doc = fixture();
        assert_eq!(ids(&doc, doc.query_selector_all("li:first-child").unwrap()), ["a", "c"]);
        assert_eq!(ids(&doc, doc.query_selector_all(".item:first-child").unwrap()), ["a", "s", "c"]);
        assert_eq!(ids(&doc, doc.query_selector_all("li:last-child").unwrap()), ["b", "c"]);
        assert_eq!(ids(&doc, doc.query_selector_all(".item:only-child").unwrap()), ["s", "c"]);
        assert_eq!(ids(&doc, doc.query_selector_all(".item:empty").unwrap()), ["s", "c"]);
    }

    #[test]
    fn test_nth_child_arguments() {
        let doc = numbered();
        let select = |selector: &str| ids(&doc, doc.query_selector_all(selector).unwrap());

        assert_eq!(select("li:nth-child(2)"), ["n2"]);
        assert_eq!(select("li:nth-child(odd)"), ["n1", "n3", "n5"]);
        assert_eq!(select("li:nth-child( 2n + 1 )"), ["n1", "n3", "n5"]);
        assert_eq!(select("li:nth-child(even)"), ["n2", "n4", "n6"]);
        assert_eq!(select("li:nth-child(3n)"), ["n3", "n6"]);
        assert_eq!(select("li:nth-child(-n+2)"), ["n1", "n2"]);
        assert_eq!(select("li:nth-child(n+5)"), ["n5", "n6"]);
        assert_eq!(select("li:nth-last-child(1)"), ["n6"]);
        assert!(select("li:nth-child(0)").is_empty());
    }

    #[test]
    fn test_not_takes_a_selector_list() {
        let doc = fixture();
        assert_eq!(ids(&doc, doc.query_selector_all("li:not(.done)").unwrap()), ["b", "c"]);
        assert_eq!(ids(&doc, doc.query_selector_all("li:not(#a, #c)").unwrap()), ["b"]);
        assert_eq!(ids(&doc, doc.query_selector_all("li:not(#a, #b), span").unwrap()), ["s", "c"]);
        assert_eq!(ids(&doc, doc.query_selector_all("li:not(ul > li)").unwrap()), ["c"]);
    }

    #[test]
    fn test_sibling_combinators() {
        let doc = numbered();
        let select = |selector: &str| ids(&doc, doc.query_selector_all(selector).unwrap());

        assert_eq!(select("#n2 + li"), ["n3"]);
        assert_eq!(select("#n4 ~ li"), ["n5", "n6"]);
        assert_eq!(select("li + li:last-child"), ["n6"]);
        assert_eq!(select("ol > li:first-child ~ #n3"), ["n3"]);
    }

    #[test]
    fn test_from_str_and_display() {
        let list: SelectorList = "ul > li".parse().unwrap();
        assert_eq!(list.to_string(), "ul > li");
    }

    #[test]
    fn test_select_within() {
        let doc = fixture();
        let list = SelectorList::parse("li").unwrap();
        let other = doc.by_id("other").unwrap();
        assert_eq!(ids(&doc, doc.select_within(other, &list)), ["c"]);
    }
}
