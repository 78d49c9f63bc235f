//! Stream actions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mutation a stream instruction performs on each target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamAction {
    /// Insert content as the target's next siblings.
    After,
    /// Insert content as the target's last children.
    Append,
    /// Insert content as the target's previous siblings.
    Before,
    /// Insert content as the target's first children.
    Prepend,
    /// Detach the target.
    Remove,
    /// Replace the target's children with the content.
    Update,
    /// Replace the target itself with the content.
    Replace,
}

impl StreamAction {
    /// Parses an `action` attribute value (case-sensitive, as written).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "after" => Some(Self::After),
            "append" => Some(Self::Append),
            "before" => Some(Self::Before),
            "prepend" => Some(Self::Prepend),
            "remove" => Some(Self::Remove),
            "update" => Some(Self::Update),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }

    /// Attribute spelling.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::After => "after",
            Self::Append => "append",
            Self::Before => "before",
            Self::Prepend => "prepend",
            Self::Remove => "remove",
            Self::Update => "update",
            Self::Replace => "replace",
        }
    }

    /// Returns `true` if the action inserts next to the target and so
    /// needs the target to have a parent.
    #[inline]
    #[must_use]
    pub const fn needs_parent(self) -> bool {
        matches!(self, Self::After | Self::Before | Self::Replace)
    }
}

impl fmt::Display for StreamAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
