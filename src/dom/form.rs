//! Form control collection.

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::document::{Document, ElementData};

/// Input types that never contribute an entry.
const SKIPPED_INPUT_TYPES: &[&str] = &["submit", "button", "reset", "image", "file"];

impl Document {
    /// Collects `(name, value)` pairs from the controls of a form, in
    /// document order, using live control state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `form` is not a `<form>` element.
    pub fn form_entries(&self, form: NodeId) -> Result<Vec<(String, String)>> {
        if !self.element(form).is_some_and(|e| e.is("form")) {
            return Err(Error::invalid_node(form, "not a form element"));
        }

        let mut entries = Vec::new();
        for node in self.descendant_elements(form) {
            let Some(element) = self.element(node) else {
                continue;
            };
            let Some(name) = element.attr("name").filter(|name| !name.is_empty()) else {
                continue;
            };
            if element.has_attr("disabled") {
                continue;
            }

            match element.name() {
                "input" => {
                    if let Some(value) = input_value(element) {
                        entries.push((name.to_string(), value));
                    }
                }
                "textarea" => {
                    let value = element
                        .value
                        .clone()
                        .unwrap_or_else(|| self.text_content(node));
                    entries.push((name.to_string(), value));
                }
                "select" => {
                    for value in self.selected_values(node, element.has_attr("multiple")) {
                        entries.push((name.to_string(), value));
                    }
                }
                _ => {}
            }
        }
        Ok(entries)
    }

    fn selected_values(&self, select: NodeId, multiple: bool) -> Vec<String> {
        let options: Vec<NodeId> = self
            .descendant_elements(select)
            .into_iter()
            .filter(|node| self.element(*node).is_some_and(|e| e.is("option")))
            .collect();

        let option_value = |node: NodeId| {
            self.element(node)
                .and_then(|e| e.attr("value"))
                .map(str::to_string)
                .unwrap_or_else(|| self.text_content(node).trim().to_string())
        };

        let selected: Vec<String> = options
            .iter()
            .filter(|node| self.element(**node).is_some_and(ElementData::is_selected))
            .map(|node| option_value(*node))
            .collect();

        if selected.is_empty() && !multiple {
            return options.first().map(|node| option_value(*node)).into_iter().collect();
        }
        if multiple {
            selected
        } else {
            selected.into_iter().take(1).collect()
        }
    }
}

impl ElementData {
    /// Current selectedness of an `<option>`.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.checked.unwrap_or_else(|| self.has_attr("selected"))
    }
}

fn input_value(element: &ElementData) -> Option<String> {
    let kind = element
        .attr("type")
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "text".to_string());

    if SKIPPED_INPUT_TYPES.contains(&kind.as_str()) {
        return None;
    }
    if kind == "checkbox" || kind == "radio" {
        return element
            .is_checked()
            .then(|| element.value().unwrap_or("on").to_string());
    }
    Some(element.value().unwrap_or_default().to_string())
}
