//! Request building shared by the engine and frames.

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::dom::SharedDocument;
use crate::error::Result;
use crate::host::Host;
use crate::identifiers::NodeId;

use super::method::Method;
use super::negotiator::Negotiator;
use super::request::RequestDescriptor;
use super::transport::{Transport, TransportResponse};

/// Anything that turns triggers into requests against the live document.
///
/// Implementors only supply their collaborators; request building and
/// fetching come for free.
#[async_trait]
pub trait RequestNegotiable: Sync {
    /// The live document.
    fn document(&self) -> &SharedDocument;

    /// Engine configuration.
    fn config(&self) -> &Config;

    /// Network transport.
    fn transport(&self) -> &dyn Transport;

    /// Browser environment.
    fn host(&self) -> &dyn Host;

    /// Builds the request for a link or form in the live document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`](crate::Error::InvalidNode) if
    /// `trigger` is not an element.
    fn build_request(&self, trigger: NodeId, explicit: Option<Method>) -> Result<RequestDescriptor> {
        let location = self.host().location();
        let cookies = self.host().cookies();
        let document = self.document().lock();
        Negotiator::new(self.config(), &document, &location, &cookies).build_request(trigger, explicit)
    }

    /// Builds the request for a programmatic visit.
    fn url_request(&self, url: &str, method: Method, stream: bool) -> RequestDescriptor {
        let location = self.host().location();
        let cookies = self.host().cookies();
        let document = self.document().lock();
        Negotiator::new(self.config(), &document, &location, &cookies).url_request(url, method, stream)
    }

    /// Sends a request through the transport.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    async fn fetch(&self, request: &RequestDescriptor) -> Result<TransportResponse> {
        debug!(url = %request.url, method = %request.method, stream = request.stream, "Fetching");
        let response = self.transport().request(request).await?;
        debug!(
            url = %request.url,
            status = response.status,
            final_url = %response.final_url,
            "Response received"
        );
        Ok(response)
    }
}
