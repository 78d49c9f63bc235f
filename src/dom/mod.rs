//! Document model.
//!
//! A small arena-backed DOM: nodes live in one `Vec` and refer to each
//! other by [`NodeId`](crate::NodeId). Slots of nodes no longer reachable
//! from the root are reused by [`Document::collect_garbage`]. Everything
//! the engine does to markup goes through this module.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `document` | [`Document`] arena, tree mutation and lookup |
//! | `parser` | Tolerant HTML parser producing a [`Document`] |
//! | `selector` | CSS selector lists ([`SelectorList`]) |
//! | `serialize` | Markup serialization |
//! | `form` | Form control collection |
//!
//! # Example
//!
//! ```ignore
//! use turbo_morph::Document;
//!
//! let doc = Document::parse(r#"<div id="x"><span>A</span></div>"#)?;
//! let x = doc.by_id("x").unwrap();
//! assert_eq!(doc.inner_html(x), "<span>A</span>");
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod document;
mod form;
mod parser;
mod selector;
mod serialize;

// ============================================================================
// Re-exports
// ============================================================================

pub use document::{Document, ElementData, NodeData, SharedDocument};
pub use selector::SelectorList;
