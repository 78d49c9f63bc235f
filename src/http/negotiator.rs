//! Trigger element to request descriptor.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};
use url::Url;
use url::form_urlencoded;

use crate::config::Config;
use crate::dom::{Document, ElementData};
use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::csrf::csrf_token;
use super::method::Method;
use super::request::{RequestDescriptor, accept_for};

// ============================================================================
// Negotiator
// ============================================================================

/// Builds [`RequestDescriptor`]s from links and forms of one document.
///
/// Borrows everything it reads, so it is created per request while the
/// document lock is held.
#[derive(Debug, Clone, Copy)]
pub struct Negotiator<'a> {
    config: &'a Config,
    document: &'a Document,
    location: &'a str,
    cookies: &'a str,
}

impl<'a> Negotiator<'a> {
    /// Creates a negotiator over `document` located at `location`.
    #[must_use]
    pub fn new(config: &'a Config, document: &'a Document, location: &'a str, cookies: &'a str) -> Self {
        Self {
            config,
            document,
            location,
            cookies,
        }
    }

    /// Builds the request for a link or form.
    ///
    /// Method resolution: `explicit`, then the method override attribute,
    /// then a form's `method`, then `get`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `trigger` is not an element.
    pub fn build_request(&self, trigger: NodeId, explicit: Option<Method>) -> Result<RequestDescriptor> {
        let element = self
            .document
            .element(trigger)
            .ok_or_else(|| Error::invalid_node(trigger, "trigger is not an element"))?;

        let method = explicit.unwrap_or_else(|| self.resolve_method(element));
        let stream = element.has_attr(&self.config.stream_attribute);
        let target = element
            .attr("action")
            .filter(|action| !action.is_empty())
            .or_else(|| element.attr("href"))
            .unwrap_or_default();
        let url = self.resolve_url(target);

        if element.is("form") {
            let entries = self.document.form_entries(trigger)?;
            return Ok(self.form_request(url, method, entries, stream));
        }
        Ok(self.url_request(&url, method, stream))
    }

    /// Builds the request for a programmatic visit.
    ///
    /// Non-`get` methods are posted with the override field, exactly as a
    /// link carrying the method attribute would be.
    #[must_use]
    pub fn url_request(&self, url: &str, method: Method, stream: bool) -> RequestDescriptor {
        let url = self.resolve_url(url);
        if method == Method::Get {
            return RequestDescriptor {
                csrf_header: self.config.csrf_header.clone(),
                ..RequestDescriptor::get(url, stream)
            };
        }

        let entries = if method.is_native() {
            Vec::new()
        } else {
            vec![(self.config.method_param.clone(), method.as_str().to_string())]
        };
        self.form_request(url, Method::Post, entries, stream)
            .with_override(method)
    }

    fn resolve_method(&self, element: &ElementData) -> Method {
        let declared = element
            .attr(&self.config.method_attribute)
            .filter(|value| !value.is_empty())
            .or_else(|| element.is("form").then(|| element.attr("method")).flatten())
            .filter(|value| !value.is_empty());

        match declared {
            None => Method::Get,
            Some(value) => Method::parse(value).unwrap_or_else(|| {
                warn!(method = %value, "Unknown method, falling back to get");
                Method::Get
            }),
        }
    }

    /// Resolves `target` against the current location, falling back to the
    /// raw value when either does not parse. Empty means the location.
    fn resolve_url(&self, target: &str) -> String {
        if target.is_empty() {
            return self.location.to_string();
        }
        Url::parse(self.location)
            .and_then(|base| base.join(target))
            .map(String::from)
            .unwrap_or_else(|_| target.to_string())
    }

    fn form_request(
        &self,
        url: String,
        method: Method,
        mut entries: Vec<(String, String)>,
        stream: bool,
    ) -> RequestDescriptor {
        let mut method_override = None;
        if !method.is_native() {
            let param = &self.config.method_param;
            if !entries.iter().any(|(name, _)| name == param) {
                entries.push((param.clone(), method.as_str().to_string()));
            }
            method_override = Some(method);
        }

        let transport_method = if method == Method::Get { Method::Get } else { Method::Post };
        let (url, body) = if transport_method == Method::Get {
            (append_query(url, &entries), None)
        } else {
            (url, Some(encode(&entries)))
        };

        let csrf_token = transport_method
            .is_state_changing()
            .then(|| csrf_token(self.document, self.cookies, self.config))
            .flatten();

        debug!(url = %url, method = %transport_method, stream, "Built request");
        RequestDescriptor {
            url,
            method: transport_method,
            body,
            accept: accept_for(stream).to_string(),
            csrf_token,
            csrf_header: self.config.csrf_header.clone(),
            method_override,
            stream,
        }
    }
}

impl RequestDescriptor {
    fn with_override(mut self, method: Method) -> Self {
        if !method.is_native() {
            self.method_override = Some(method);
        }
        self
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn encode(entries: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(entries)
        .finish()
}

fn append_query(url: String, entries: &[(String, String)]) -> String {
    if entries.is_empty() {
        return url;
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", encode(entries))
}

// ============================================================================
// Tests
// ============================================================================
