//! Navigation engine.
//!
//! The [`Engine`] owns the live document and routes every DOM event to
//! the component responsible for it.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Engine struct, accessors, start-up |
//! | `builder` | [`EngineBuilder`] |
//! | `events` | [`DomEvent`], [`Trigger`], [`Dispatch`] |
//! | `navigation` | Click/submit routing, visit and submit pipelines |
//! | `restore` | History restore and reload fallback |
//! | `frames` | Frame registry and connection |
//!
//! # Example
//!
//! ```ignore
//! use turbo_morph::{DomEvent, Engine};
//!
//! let engine = Engine::builder()
//!     .transport(transport)
//!     .host(host)
//!     .markup(&initial_html)?
//!     .build()?;
//!
//! engine.start().await;
//!
//! // Route browser events as they arrive
//! engine.dispatch(DomEvent::Click { target: clicked }).await?;
//! engine.spawn(DomEvent::PopState { state: Some(id) });
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod builder;
mod core;
mod events;
mod frames;
mod navigation;
mod restore;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::EngineBuilder;
pub use core::Engine;
pub use events::{Dispatch, DomEvent, Trigger};
