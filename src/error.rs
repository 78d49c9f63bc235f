//! Error types for turbo-morph.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use turbo_morph::{Engine, Result};
//!
//! async fn example(engine: &Engine) -> Result<()> {
//!     engine.visit("/inbox", Method::Get, false).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Network | [`Error::Transport`], [`Error::TooManyRedirects`] |
//! | Markup | [`Error::Parse`], [`Error::InvalidSelector`], [`Error::UnsupportedSelector`] |
//! | Document | [`Error::NodeNotFound`], [`Error::InvalidNode`] |
//! | History | [`Error::SnapshotNotFound`] |
//! | External | [`Error::Json`], [`Error::Url`], [`Error::Task`] |
//!
//! Component-local conditions (a stream target that does not exist, a frame
//! without an `id`, a frame source answering 404) are not errors: they are
//! logged and skipped by the component that meets them.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::{NodeId, SnapshotId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when engine configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Network Errors
    // ========================================================================
    /// The transport failed to produce a response.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// URL of the failed request.
        url: String,
        /// Description of the transport failure.
        message: String,
    },

    /// A redirect chain exceeded the configured limit.
    #[error("Too many redirects ({limit}) while loading {url}")]
    TooManyRedirects {
        /// Last URL in the redirect chain.
        url: String,
        /// Configured redirect limit.
        limit: usize,
    },

    // ========================================================================
    // Markup Errors
    // ========================================================================
    /// Markup could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// A CSS selector list is malformed.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// The selector source text.
        selector: String,
        /// What is wrong with it.
        message: String,
    },

    /// A CSS selector list is well formed but uses a feature the matcher
    /// does not implement, such as `:hover` or pseudo-elements.
    #[error("Unsupported selector '{selector}': {message}")]
    UnsupportedSelector {
        /// The selector source text.
        selector: String,
        /// The unsupported feature.
        message: String,
    },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Node id does not exist in the document arena.
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// The missing node.
        node_id: NodeId,
    },

    /// Node exists but cannot take part in the requested operation.
    #[error("Invalid node {node_id}: {message}")]
    InvalidNode {
        /// The offending node.
        node_id: NodeId,
        /// Why the operation was rejected.
        message: String,
    },

    // ========================================================================
    // History Errors
    // ========================================================================
    /// Snapshot id is unknown to the history cache.
    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound {
        /// The missing snapshot id.
        snapshot_id: SnapshotId,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A spawned dispatch task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a too-many-redirects error.
    #[inline]
    pub fn too_many_redirects(url: impl Into<String>, limit: usize) -> Self {
        Self::TooManyRedirects {
            url: url.into(),
            limit,
        }
    }

    /// Creates a parse error.
    #[inline]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported selector error.
    #[inline]
    pub fn unsupported_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates a node not found error.
    #[inline]
    pub fn node_not_found(node_id: NodeId) -> Self {
        Self::NodeNotFound { node_id }
    }

    /// Creates an invalid node error.
    #[inline]
    pub fn invalid_node(node_id: NodeId, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            node_id,
            message: message.into(),
        }
    }

    /// Creates a snapshot not found error.
    #[inline]
    pub fn snapshot_not_found(snapshot_id: SnapshotId) -> Self {
        Self::SnapshotNotFound { snapshot_id }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error came from the network layer.
    #[inline]
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::TooManyRedirects { .. })
    }

    /// Returns `true` if this error was caused by malformed markup.
    #[inline]
    #[must_use]
    pub fn is_markup_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidSelector { .. } | Self::UnsupportedSelector { .. }
        )
    }

    /// Returns `true` if this is a document structure error.
    #[inline]
    #[must_use]
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. } | Self::InvalidNode { .. })
    }

    /// Returns `true` if the engine compensates for this error itself.
    ///
    /// History restore failures fall back to a full reload instead of
    /// reaching the caller.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SnapshotNotFound { .. } | Self::Parse { .. } | Self::NodeNotFound { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::transport("/inbox", "connection refused");
        assert_eq!(
            err.to_string(),
            "Transport error for /inbox: connection refused"
        );
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("frame tag must not be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: frame tag must not be empty"
        );
    }

    #[test]
    fn test_is_network_error() {
        let transport_err = Error::transport("/a", "reset");
        let redirect_err = Error::too_many_redirects("/a", 20);
        let other_err = Error::parse("unclosed comment");

        assert!(transport_err.is_network_error());
        assert!(redirect_err.is_network_error());
        assert!(!other_err.is_network_error());
    }

    #[test]
    fn test_is_markup_error() {
        assert!(Error::parse("x").is_markup_error());
        assert!(Error::invalid_selector("a[", "unterminated").is_markup_error());
        assert!(Error::unsupported_selector("a:hover", "unsupported pseudo-class").is_markup_error());
        assert!(!Error::config("x").is_markup_error());
    }

    #[test]
    fn test_is_recoverable() {
        let missing = Error::snapshot_not_found(SnapshotId::generate());
        let network = Error::transport("/a", "reset");

        assert!(missing.is_recoverable());
        assert!(!network.is_recoverable());
    }

    #[test]
    fn test_from_url_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::Url(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
