//! Stream document application.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::dom::{Document, SelectorList};
use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::action::StreamAction;

// ============================================================================
// StreamReport
// ============================================================================

/// Outcome of one [`StreamProcessor::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamReport {
    /// Instructions found in the fragment.
    pub instructions: usize,
    /// Target applications performed.
    pub applied: usize,
    /// Instructions or targets skipped (unknown action, missing target,
    /// detached target).
    pub skipped: usize,
}

// ============================================================================
// StreamProcessor
// ============================================================================

/// Applies stream documents to a live document.
#[derive(Debug, Clone)]
pub struct StreamProcessor {
    stream_tag: String,
}

impl StreamProcessor {
    /// Creates a processor recognizing the configured stream tag.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            stream_tag: config.stream_tag.clone(),
        }
    }

    /// Parses `markup` and applies each instruction in document order.
    ///
    /// # Errors
    ///
    /// - [`Error::Parse`](crate::Error::Parse) if the fragment does not parse
    /// - [`Error::InvalidSelector`](crate::Error::InvalidSelector) if an
    ///   instruction's `targets` is not a valid selector list; instructions
    ///   before it stay applied
    ///
    /// Instructions whose `targets` use selector features the matcher does
    /// not implement are skipped with a warning.
    pub fn apply(&self, document: &mut Document, markup: &str) -> Result<StreamReport> {
        let fragment = Document::parse(markup)?;
        let instructions = self.instructions(&fragment);
        let mut report = StreamReport {
            instructions: instructions.len(),
            ..StreamReport::default()
        };

        for instruction in instructions {
            let Some(element) = fragment.element(instruction) else {
                continue;
            };

            let Some(action) = element.attr("action").and_then(StreamAction::parse) else {
                warn!(action = ?element.attr("action"), "Unknown stream action, skipping");
                report.skipped += 1;
                continue;
            };

            let target_id = element.attr("target").filter(|id| !id.is_empty());
            let selectors = match element
                .attr("targets")
                .filter(|targets| !targets.trim().is_empty())
                .map(SelectorList::parse)
                .transpose()
            {
                Ok(selectors) => selectors,
                Err(error @ Error::UnsupportedSelector { .. }) => {
                    warn!(%action, %error, "Unsupported stream selector, skipping");
                    report.skipped += 1;
                    continue;
                }
                Err(error) => return Err(error),
            };

            let content = fragment
                .descendant_elements(instruction)
                .into_iter()
                .find(|node| fragment.element(*node).is_some_and(|e| e.is("template")))
                .map(|template| fragment.children(template).to_vec())
                .unwrap_or_default();

            let targets = resolve_targets(document, target_id, selectors.as_ref());
            if targets.is_empty() {
                debug!(%action, target = ?target_id, targets = ?selectors.as_ref().map(SelectorList::as_str), "Stream target not found");
                report.skipped += 1;
                continue;
            }

            for target in targets {
                if apply_action(document, action, target, &fragment, &content)? {
                    report.applied += 1;
                } else {
                    report.skipped += 1;
                }
            }
        }

        debug!(
            instructions = report.instructions,
            applied = report.applied,
            skipped = report.skipped,
            "Applied stream"
        );
        Ok(report)
    }

    /// Stream elements in document order, not looking inside templates.
    fn instructions(&self, fragment: &Document) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = fragment.children(fragment.root()).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            let Some(element) = fragment.element(node) else {
                continue;
            };
            if element.is(&self.stream_tag) {
                found.push(node);
                continue;
            }
            if element.is("template") {
                continue;
            }
            stack.extend(fragment.children(node).iter().rev().copied());
        }
        found
    }
}

/// Id target first, then selector matches, each element once.
fn resolve_targets(document: &Document, id: Option<&str>, selectors: Option<&SelectorList>) -> Vec<NodeId> {
    let mut seen = FxHashSet::default();
    let mut targets = Vec::new();

    let by_id = id.and_then(|id| document.by_id(id));
    let by_selector = selectors
        .map(|selectors| document.select(selectors))
        .unwrap_or_default();

    for target in by_id.into_iter().chain(by_selector) {
        if seen.insert(target) {
            targets.push(target);
        }
    }
    targets
}

/// Applies one action to one target with a fresh copy of `content`.
/// Returns `false` when the target cannot take the action.
fn apply_action(
    document: &mut Document,
    action: StreamAction,
    target: NodeId,
    fragment: &Document,
    content: &[NodeId],
) -> Result<bool> {
    // an earlier target of the same instruction may have removed this one
    if !document.is_connected(target) {
        return Ok(false);
    }
    let parent = document.parent(target);
    if action.needs_parent() && parent.is_none() {
        return Ok(false);
    }

    let mut nodes = Vec::with_capacity(content.len());
    if action != StreamAction::Remove {
        for node in content {
            nodes.push(document.import(fragment, *node)?);
        }
    }

    match action {
        StreamAction::After => {
            let mut anchor = target;
            for node in nodes {
                document.insert_after(anchor, node)?;
                anchor = node;
            }
        }
        StreamAction::Before => {
            if let Some(parent) = parent {
                for node in nodes {
                    document.insert_before(parent, node, target)?;
                }
            }
        }
        StreamAction::Append => {
            for node in nodes {
                document.append_child(target, node)?;
            }
        }
        StreamAction::Prepend => match document.children(target).first().copied() {
            Some(first) => {
                for node in nodes {
                    document.insert_before(target, node, first)?;
                }
            }
            None => {
                for node in nodes {
                    document.append_child(target, node)?;
                }
            }
        },
        StreamAction::Update => {
            document.clear_children(target)?;
            for node in nodes {
                document.append_child(target, node)?;
            }
        }
        StreamAction::Replace => {
            if let Some(parent) = parent {
                for node in nodes {
                    document.insert_before(parent, node, target)?;
                }
                document.remove(target)?;
            }
        }
        StreamAction::Remove => document.remove(target)?,
    }
    Ok(true)
}

// ============================================================================
// Tests
// ============================================================================
