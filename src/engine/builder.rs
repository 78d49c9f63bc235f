//! Builder pattern for engine configuration.
//!
//! # Example
//!
//! ```ignore
//! use turbo_morph::{Config, Engine};
//!
//! let engine = Engine::builder()
//!     .transport(transport)
//!     .host(host)
//!     .config(Config::new().with_max_redirects(5))
//!     .markup(&html)?
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::history::HistoryCache;
use crate::host::Host;
use crate::http::Transport;
use crate::reconcile::{Morph, Reconciler};
use crate::session::Session;
use crate::stream::StreamProcessor;

use super::core::Engine;

// ============================================================================
// EngineBuilder
// ============================================================================

/// Builder for an [`Engine`].
///
/// Use [`Engine::builder()`] to create one.
#[derive(Default)]
pub struct EngineBuilder {
    /// Network transport (required).
    transport: Option<Arc<dyn Transport>>,
    /// Browser environment (required).
    host: Option<Arc<dyn Host>>,
    /// Reconciler, [`Morph`] when unset.
    reconciler: Option<Arc<dyn Reconciler>>,
    /// History cache, fresh when unset.
    history: Option<Arc<HistoryCache>>,
    /// Initial live document, empty when unset.
    document: Option<Document>,
    /// Engine configuration.
    config: Config,
}

impl fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("has_transport", &self.transport.is_some())
            .field("has_host", &self.host.is_some())
            .field("reconciler", &self.reconciler)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// EngineBuilder Implementation
// ============================================================================

impl EngineBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network transport.
    #[inline]
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the browser environment.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Replaces the default [`Morph`] reconciler.
    #[inline]
    #[must_use]
    pub fn reconciler(mut self, reconciler: Arc<dyn Reconciler>) -> Self {
        self.reconciler = Some(reconciler);
        self
    }

    /// Shares an existing history cache.
    #[inline]
    #[must_use]
    pub fn history(mut self, history: Arc<HistoryCache>) -> Self {
        self.history = Some(history);
        self
    }

    /// Sets the initial live document.
    #[inline]
    #[must_use]
    pub fn document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    /// Parses and sets the initial live document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `markup` does not parse.
    pub fn markup(self, markup: &str) -> Result<Self> {
        Ok(self.document(Document::parse(markup)?))
    }

    /// Sets the configuration.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the transport or host is missing
    /// - [`Error::Config`] if the configuration is invalid
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;

        let transport = self.transport.ok_or_else(|| {
            Error::config("Transport is required. Use .transport() to set it.")
        })?;
        let host = self
            .host
            .ok_or_else(|| Error::config("Host is required. Use .host() to set it."))?;

        let session = Session {
            streams: StreamProcessor::new(&self.config),
            config: self.config,
            document: self.document.unwrap_or_default().into_shared(),
            history: self.history.unwrap_or_default(),
            transport,
            host,
            reconciler: self.reconciler.unwrap_or_else(|| Arc::new(Morph::new())),
        };
        Ok(Engine::from_session(session))
    }
}

// ============================================================================
// Tests
// ============================================================================
