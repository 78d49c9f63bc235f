//! Turbo Morph - Progressive navigation engine.
//!
//! This library intercepts link clicks and form submissions on a live
//! document, fetches the target over a pluggable [`Transport`], and
//! reconciles the response into the page instead of performing a full
//! browser navigation.
//!
//! # Architecture
//!
//! The engine sits between the browser environment and the network:
//!
//! - **Host (browser)**: address bar, cookies, scroll, history entries,
//!   paint scheduling, behind the [`Host`] trait
//! - **Transport (network)**: one request in, one response out, behind the
//!   [`Transport`] trait
//! - **Engine (Rust)**: owns the live [`Document`] and routes every
//!   [`DomEvent`] to page navigation, a [`Frame`], or a history restore
//!
//! Key design principles:
//!
//! - The live document is only replaced by reconciliation ([`Morph`]), so
//!   node identity and control state survive where the markup allows
//! - Every page is snapshotted before it is left; back/forward restores
//!   from the [`HistoryCache`] or falls back to a reload
//! - Frames and stream responses patch only part of the page and never
//!   touch history
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use turbo_morph::{DomEvent, Engine, Result};
//!
//! async fn run(transport: Arc<MyTransport>, host: Arc<MyHost>, html: &str) -> Result<()> {
//!     let engine = Engine::builder()
//!         .transport(transport)
//!         .host(host)
//!         .markup(html)?
//!         .build()?;
//!
//!     engine.start().await;
//!
//!     let link = engine.with_document(|doc| doc.by_id("next")).unwrap();
//!     let outcome = engine.dispatch(DomEvent::Click { target: link }).await?;
//!     println!("{outcome:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Tag, attribute and limit configuration |
//! | [`dom`] | Arena document, parser, selectors, serializer |
//! | [`engine`] | [`Engine`], its builder and event routing |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`frame`] | Frame controller |
//! | [`history`] | Snapshot cache |
//! | [`host`] | Browser environment seam |
//! | [`http`] | Request negotiation, CSRF, transport seam |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`reconcile`] | Document reconciliation |
//! | [`stream`] | Stream instruction processor |

// ============================================================================
// Modules
// ============================================================================

/// Engine configuration.
pub mod config;

/// Arena-backed document model.
///
/// - [`Document`] - node arena with mutation and traversal
/// - [`SelectorList`] - CSS selector subset
pub mod dom;

/// Navigation engine.
///
/// Use [`Engine::builder()`] to create an engine instance.
pub mod engine;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Frame controller.
pub mod frame;

/// Page snapshots keyed by history entry.
pub mod history;

/// Browser environment seam.
pub mod host;

/// Request negotiation and the network seam.
pub mod http;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing snapshot and node IDs at compile time.
pub mod identifiers;

/// Document reconciliation.
pub mod reconcile;

/// Stream instruction processing.
pub mod stream;

mod session;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::Config;

// Document types
pub use dom::{Document, ElementData, NodeData, SelectorList, SharedDocument};

// Engine types
pub use engine::{Dispatch, DomEvent, Engine, EngineBuilder, Trigger};

// Error types
pub use error::{Error, Result};

// Frame types
pub use frame::{Frame, FrameLoad, FrameRender};

// History types
pub use history::{HistoryCache, ScrollPosition, Snapshot};

// Host types
pub use host::{FrameCallback, Host, LifecycleEvent};

// HTTP types
pub use http::{
    HTML_ACCEPT, Method, Negotiator, RequestDescriptor, RequestNegotiable, STREAM_ACCEPT,
    Transport, TransportResponse,
};

// Identifier types
pub use identifiers::{NodeId, SnapshotId};

// Reconciliation types
pub use reconcile::{Morph, ReconcileOptions, Reconciler};

// Stream types
pub use stream::{StreamAction, StreamProcessor, StreamReport};
