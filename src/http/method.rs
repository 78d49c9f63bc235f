//! HTTP methods.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request method as written on a link or form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// `get`, the default.
    #[default]
    Get,
    /// `post`.
    Post,
    /// `put`, tunnelled over `post`.
    Put,
    /// `patch`, tunnelled over `post`.
    Patch,
    /// `delete`, tunnelled over `post`.
    Delete,
}

impl Method {
    /// Parses a method name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Lowercase method name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` if a plain HTML form can send this method.
    #[inline]
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Get | Self::Post)
    }

    /// Returns `true` for every method except `get`.
    #[inline]
    #[must_use]
    pub const fn is_state_changing(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
        assert_eq!(Method::parse(" Patch "), Some(Method::Patch));
        assert_eq!(Method::parse("head"), None);
    }

    #[test]
    fn test_native_methods() {
        assert!(Method::Get.is_native());
        assert!(Method::Post.is_native());
        assert!(!Method::Delete.is_native());
        assert!(!Method::Get.is_state_changing());
        assert!(Method::Put.is_state_changing());
    }
}
