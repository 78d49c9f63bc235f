//! Request negotiation and transport.
//!
//! Everything between a triggering element and the bytes that come back:
//!
//! | Module | Description |
//! |--------|-------------|
//! | `method` | [`Method`] and native/override classification |
//! | `request` | [`RequestDescriptor`] and its headers |
//! | `csrf` | CSRF token lookup from cookies and meta tags |
//! | `negotiator` | [`Negotiator`], trigger element to request |
//! | `transport` | [`Transport`] trait and [`TransportResponse`] |
//! | `negotiable` | [`RequestNegotiable`], shared by engine and frames |

// ============================================================================
// Submodules
// ============================================================================

mod csrf;
mod method;
mod negotiable;
mod negotiator;
mod request;
mod transport;

// ============================================================================
// Re-exports
// ============================================================================

pub use csrf::{cookie_value, csrf_token, meta_content};
pub use method::Method;
pub use negotiable::RequestNegotiable;
pub use negotiator::Negotiator;
pub use request::{HTML_ACCEPT, RequestDescriptor, STREAM_ACCEPT};
pub use transport::{Transport, TransportResponse};
