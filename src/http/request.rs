//! Outgoing request parameters.

use serde::{Deserialize, Serialize};

use super::method::Method;

/// Accept header for stream-patch requests.
pub const STREAM_ACCEPT: &str = "text/vnd.turbo-stream.html";

/// Accept header for ordinary page requests.
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Everything the transport needs to issue one request.
///
/// `method` is always `get` or `post`; other verbs travel in the body and
/// are recorded in `method_override`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    /// Absolute (or unresolvable raw) request URL.
    pub url: String,
    /// Transport-level method.
    pub method: Method,
    /// Form-urlencoded body for `post` requests.
    pub body: Option<String>,
    /// Accept header value.
    pub accept: String,
    /// CSRF token, when one was found.
    pub csrf_token: Option<String>,
    /// Header name used for the CSRF token.
    pub csrf_header: String,
    /// Verb tunnelled through the method override field.
    pub method_override: Option<Method>,
    /// Whether a stream-patch response was requested.
    pub stream: bool,
}

impl RequestDescriptor {
    /// A plain `get` for `url`.
    #[must_use]
    pub fn get(url: impl Into<String>, stream: bool) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            body: None,
            accept: accept_for(stream).to_string(),
            csrf_token: None,
            csrf_header: "X-CSRF-Token".to_string(),
            method_override: None,
            stream,
        }
    }

    /// The `get` that follows a redirect to `final_url`. The stream flag
    /// is dropped so the result renders as a page.
    #[must_use]
    pub fn follow_redirect(&self, final_url: impl Into<String>) -> Self {
        Self {
            csrf_header: self.csrf_header.clone(),
            ..Self::get(final_url, false)
        }
    }

    /// The method the server should act on.
    #[inline]
    #[must_use]
    pub fn effective_method(&self) -> Method {
        self.method_override.unwrap_or(self.method)
    }

    /// Request headers in a stable order.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Accept".to_string(), self.accept.clone())];
        if self.method.is_state_changing()
            && let Some(token) = &self.csrf_token
        {
            headers.push((self.csrf_header.clone(), token.clone()));
        }
        if self.body.is_some() {
            headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
        }
        headers
    }

    /// Looks up a header value, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers()
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

/// Accept header value for the stream flag.
#[inline]
#[must_use]
pub(crate) fn accept_for(stream: bool) -> &'static str {
    if stream { STREAM_ACCEPT } else { HTML_ACCEPT }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_has_only_accept() {
        let request = RequestDescriptor::get("https://app.test/a", false);
        assert_eq!(request.headers(), vec![("Accept".to_string(), HTML_ACCEPT.to_string())]);
    }

    #[test]
    fn test_post_headers_include_token_and_content_type() {
        let request = RequestDescriptor {
            method: Method::Post,
            body: Some("a=1".to_string()),
            csrf_token: Some("tok".to_string()),
            ..RequestDescriptor::get("https://app.test/a", true)
        };

        assert_eq!(request.header("accept").as_deref(), Some(STREAM_ACCEPT));
        assert_eq!(request.header("x-csrf-token").as_deref(), Some("tok"));
        assert_eq!(request.header("content-type").as_deref(), Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn test_token_not_sent_on_get() {
        let request = RequestDescriptor {
            csrf_token: Some("tok".to_string()),
            ..RequestDescriptor::get("https://app.test/a", false)
        };
        assert_eq!(request.header("X-CSRF-Token"), None);
    }

    #[test]
    fn test_follow_redirect_downgrades() {
        let request = RequestDescriptor {
            method: Method::Post,
            body: Some("_method=delete".to_string()),
            method_override: Some(Method::Delete),
            ..RequestDescriptor::get("https://app.test/a", true)
        };
        let next = request.follow_redirect("https://app.test/b");

        assert_eq!(next.method, Method::Get);
        assert_eq!(next.body, None);
        assert!(!next.stream);
        assert_eq!(next.accept, HTML_ACCEPT);
        assert_eq!(request.effective_method(), Method::Delete);
    }
}
