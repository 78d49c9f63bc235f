//! Network transport seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::request::RequestDescriptor;

/// Issues requests on behalf of the engine.
///
/// Implementations follow redirects themselves (reporting them through
/// [`TransportResponse::redirected`]) or hand back the 3xx response; the
/// engine handles both.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) when no
    /// response could be obtained.
    async fn request(&self, request: &RequestDescriptor) -> Result<TransportResponse>;
}

/// What came back from the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Whether the transport followed a redirect to get here.
    pub redirected: bool,
    /// URL the body was served from.
    pub final_url: String,
    /// Response body text.
    pub body: String,
}

impl TransportResponse {
    /// A `200 OK` served from `url`.
    #[must_use]
    pub fn ok(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            redirected: false,
            final_url: url.into(),
            body: body.into(),
        }
    }

    /// A response the transport reached by following a redirect.
    #[must_use]
    pub fn redirected(final_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            redirected: true,
            ..Self::ok(final_url, body)
        }
    }

    /// A bare status with no body.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            status,
            ..Self::ok(url, "")
        }
    }

    /// Returns `true` for a followed redirect or a 3xx status.
    #[inline]
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        self.redirected || (300..400).contains(&self.status)
    }

    /// Returns `true` for `204 No Content`.
    #[inline]
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }

    /// Returns `true` for `404 Not Found`.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}
