//! Browser environment seam.
//!
//! The engine never touches browser globals. Everything it needs from the
//! surrounding environment (address, cookies, scroll, history storage,
//! lifecycle events, paint scheduling, hard reload) goes through [`Host`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::history::ScrollPosition;
use crate::identifiers::SnapshotId;

// ============================================================================
// Types
// ============================================================================

/// Callback run by the host on the next animation frame.
pub type FrameCallback = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle notifications emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// A page, frame visit or history restore finished rendering.
    Load,
}

impl LifecycleEvent {
    /// Returns the DOM event name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "turbo:load",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Host Trait
// ============================================================================

/// Services provided by the embedding browser environment.
pub trait Host: Send + Sync {
    /// Current document address.
    fn location(&self) -> String;

    /// The raw `document.cookie` string.
    fn cookies(&self) -> String {
        String::new()
    }

    /// Current scroll offsets.
    fn scroll_position(&self) -> ScrollPosition;

    /// Scrolls the viewport.
    fn scroll_to(&self, position: ScrollPosition);

    /// Pushes a history entry holding `state` and moves the address to `url`.
    fn push_state(&self, state: SnapshotId, url: &str);

    /// Replaces the state of the current history entry.
    fn replace_state(&self, state: SnapshotId);

    /// Performs a full, non-progressive navigation to `url`.
    fn reload(&self, url: &str);

    /// Dispatches a lifecycle event on the document.
    fn dispatch(&self, event: LifecycleEvent);

    /// Runs `callback` before the next paint.
    fn request_animation_frame(&self, callback: FrameCallback);
}
