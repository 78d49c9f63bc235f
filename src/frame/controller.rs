//! Frame controller.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dom::{Document, SharedDocument};
use crate::engine::Trigger;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::http::{Method, RequestDescriptor, RequestNegotiable, Transport};
use crate::identifiers::NodeId;
use crate::reconcile::ReconcileOptions;
use crate::session::{Session, sweep};
use crate::stream::StreamReport;

// ============================================================================
// Types
// ============================================================================

/// Outcome of [`Frame::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLoad {
    /// Content was reconciled from `url`.
    Loaded {
        /// URL the content finally came from.
        url: String,
    },
    /// The source answered 404; the frame was left untouched.
    NotFound,
}

/// Outcome of rendering a response into a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRender {
    /// The frame was reconciled against the matching response element.
    Rendered,
    /// The response was a stream document.
    Streamed(StreamReport),
    /// The frame element has no `id`; nothing was done.
    MissingId,
    /// The response has no element with the frame's `id`; nothing was done.
    NotInResponse,
    /// The trigger was neither a link nor a form.
    Ignored,
}

struct FrameInner {
    element: NodeId,
    session: Arc<Session>,
}

// ============================================================================
// Frame
// ============================================================================

/// Handle to one frame element of the live document.
///
/// Cheap to clone; clones refer to the same frame.
#[derive(Clone)]
pub struct Frame {
    inner: Arc<FrameInner>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("element", &self.inner.element)
            .field("id", &self.id())
            .field("src", &self.src())
            .finish_non_exhaustive()
    }
}

impl Frame {
    pub(crate) fn new(element: NodeId, session: Arc<Session>) -> Self {
        Self {
            inner: Arc::new(FrameInner { element, session }),
        }
    }

    /// The frame element.
    #[inline]
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.inner.element
    }

    /// Current non-empty `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.inner
            .session
            .document
            .lock()
            .element(self.inner.element)
            .and_then(|e| e.id())
            .map(str::to_string)
    }

    /// Current non-empty `src` attribute.
    #[must_use]
    pub fn src(&self) -> Option<String> {
        self.inner
            .session
            .document
            .lock()
            .element(self.inner.element)
            .and_then(|e| e.attr("src"))
            .filter(|src| !src.is_empty())
            .map(str::to_string)
    }

    /// Returns `true` while the frame element is attached to the document.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.session.document.lock().is_connected(self.inner.element)
    }
}

// ============================================================================
// Frame - Loading
// ============================================================================

impl Frame {
    /// Loads the frame's content from `url`.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the request fails
    /// - [`Error::TooManyRedirects`] if redirects exceed the limit
    /// - [`Error::Parse`] if the response does not parse
    pub async fn load(&self, url: &str) -> Result<FrameLoad> {
        let limit = self.inner.session.config.max_redirects;
        let mut url = url.to_string();
        let mut hops = 0;

        loop {
            debug!(frame = %self.inner.element, url = %url, "Loading frame");
            let request = self.url_request(&url, Method::Get, false);
            let response = self.fetch(&request).await?;

            if response.is_not_found() {
                warn!(frame = %self.inner.element, url = %url, "Frame source returned 404 Not Found");
                return Ok(FrameLoad::NotFound);
            }
            let landed = response.redirected && response.final_url == request.url;
            if response.is_redirect() && !landed {
                hops += 1;
                if hops > limit {
                    return Err(Error::too_many_redirects(response.final_url, limit));
                }
                url = response.final_url;
                continue;
            }

            let source = Document::parse(&response.body)?;
            let target = source.body().unwrap_or_else(|| source.root());
            {
                let mut document = self.inner.session.document.lock();
                self.inner.session.reconciler.reconcile(
                    &mut document,
                    self.inner.element,
                    &source,
                    target,
                    ReconcileOptions::children_only(),
                )?;
                sweep(&mut document);
            }
            info!(frame = %self.inner.element, url = %response.final_url, "Frame loaded");
            return Ok(FrameLoad::Loaded {
                url: response.final_url,
            });
        }
    }

    /// Reconciles the frame against the element with the same `id` in
    /// `markup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `markup` does not parse.
    pub fn render(&self, markup: &str) -> Result<FrameRender> {
        let Some(id) = self.id() else {
            warn!(frame = %self.inner.element, "Frame element has no id, not rendering");
            return Ok(FrameRender::MissingId);
        };

        let source = Document::parse(markup)?;
        let Some(target) = source.by_id(&id) else {
            warn!(frame = %self.inner.element, id = %id, "Frame element not found in response");
            return Ok(FrameRender::NotInResponse);
        };

        let mut document = self.inner.session.document.lock();
        self.inner.session.reconciler.reconcile(
            &mut document,
            self.inner.element,
            &source,
            target,
            ReconcileOptions::full(),
        )?;
        sweep(&mut document);
        debug!(frame = %self.inner.element, id = %id, "Frame rendered");
        Ok(FrameRender::Rendered)
    }
}

// ============================================================================
// Frame - Navigation
// ============================================================================

impl Frame {
    /// Visits `url` inside the frame.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), plus
    /// [`Error::InvalidSelector`] for a broken stream response.
    pub async fn visit(&self, url: &str, method: Method, stream: bool) -> Result<FrameRender> {
        let request = self.url_request(url, method, stream);
        self.perform(request).await
    }

    /// Submits `form` inside the frame.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNode`] if `form` is not an element, otherwise same
    /// as [`visit`](Self::visit).
    pub async fn submit(&self, form: NodeId) -> Result<FrameRender> {
        let request = self.build_request(form, None)?;
        self.perform(request).await
    }

    /// Handles a click or submit the engine routed to this frame.
    ///
    /// # Errors
    ///
    /// Same as [`visit`](Self::visit).
    pub async fn handle(&self, trigger: &Trigger) -> Result<FrameRender> {
        match trigger {
            Trigger::Link { element } | Trigger::Form { element } => {
                let request = self.build_request(*element, None)?;
                self.perform(request).await
            }
            Trigger::Opaque => Ok(FrameRender::Ignored),
        }
    }

    async fn perform(&self, mut request: RequestDescriptor) -> Result<FrameRender> {
        let limit = self.inner.session.config.max_redirects;
        let mut hops = 0;

        let (response, redirected) = loop {
            let response = self.fetch(&request).await?;
            if !response.is_redirect() {
                break (response, hops > 0);
            }
            hops += 1;
            if hops > limit {
                return Err(Error::too_many_redirects(response.final_url, limit));
            }
            debug!(frame = %self.inner.element, to = %response.final_url, "Frame request redirected");
            request = request.follow_redirect(response.final_url);
        };

        let outcome = if request.stream && !redirected {
            FrameRender::Streamed(self.inner.session.apply_stream(&response.body)?)
        } else {
            self.render(&response.body)?
        };

        if matches!(outcome, FrameRender::Rendered | FrameRender::Streamed(_)) {
            self.inner.session.schedule_load();
        }
        Ok(outcome)
    }
}

// ============================================================================
// RequestNegotiable
// ============================================================================

impl RequestNegotiable for Frame {
    fn document(&self) -> &SharedDocument {
        &self.inner.session.document
    }

    fn config(&self) -> &Config {
        &self.inner.session.config
    }

    fn transport(&self) -> &dyn Transport {
        self.inner.session.transport.as_ref()
    }

    fn host(&self) -> &dyn Host {
        self.inner.session.host.as_ref()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::host::LifecycleEvent;
    use crate::http::TransportResponse;
    use crate::testing::{MockHost, MockTransport};

    const PAGE: &str = r#"<html><body><h1>Page</h1><turbo-frame id="inbox"><p>old</p><a id="l" href="/inbox/2">next</a></turbo-frame></body></html>"#;

    fn setup(page: &str) -> (Engine, Arc<MockTransport>, Arc<MockHost>) {
        let transport = Arc::new(MockTransport::new());
        let host = Arc::new(MockHost::new("https://app.test/"));
        let engine = Engine::builder()
            .transport(transport.clone())
            .host(host.clone())
            .markup(page)
            .unwrap()
            .build()
            .unwrap();
        (engine, transport, host)
    }

    fn frame(engine: &Engine, id: &str) -> Frame {
        let node = engine.with_document(|doc| doc.by_id(id)).unwrap();
        engine.frame(node)
    }

    #[tokio::test]
    async fn test_load_reconciles_children_against_body() {
        let (engine, transport, _) = setup(r#"<turbo-frame id="f" src="/f"></turbo-frame>"#);
        transport.respond(Method::Get, "https://app.test/f", TransportResponse::ok("https://app.test/f", "<html><body><p>loaded</p></body></html>"));

        let result = frame(&engine, "f").load("/f").await.unwrap();

        assert_eq!(result, FrameLoad::Loaded { url: "https://app.test/f".to_string() });
        assert_eq!(
            engine.html(),
            r#"<turbo-frame id="f" src="/f"><p>loaded</p></turbo-frame>"#
        );
    }

    #[tokio::test]
    async fn test_load_404_leaves_frame_unchanged() {
        let (engine, transport, _) = setup(r#"<turbo-frame id="f"><p>keep</p></turbo-frame>"#);
        transport.respond(Method::Get, "https://app.test/f", TransportResponse::status("https://app.test/f", 404));

        let result = frame(&engine, "f").load("/f").await.unwrap();

        assert_eq!(result, FrameLoad::NotFound);
        assert_eq!(engine.html(), r#"<turbo-frame id="f"><p>keep</p></turbo-frame>"#);
    }

    #[tokio::test]
    async fn test_load_follows_redirect() {
        let (engine, transport, _) = setup(r#"<turbo-frame id="f"></turbo-frame>"#);
        transport.respond(Method::Get, "https://app.test/f", TransportResponse::status("https://app.test/g", 302));
        transport.respond(Method::Get, "https://app.test/g", TransportResponse::ok("https://app.test/g", "<p>g</p>"));

        let result = frame(&engine, "f").load("/f").await.unwrap();

        assert_eq!(result, FrameLoad::Loaded { url: "https://app.test/g".to_string() });
        assert_eq!(engine.html(), r#"<turbo-frame id="f"><p>g</p></turbo-frame>"#);
    }

    #[tokio::test]
    async fn test_load_followed_redirect_back_to_same_url() {
        let (engine, transport, _) = setup(r#"<turbo-frame id="f"></turbo-frame>"#);
        transport.respond(Method::Get, "https://app.test/f", TransportResponse::redirected("https://app.test/f", "<p>f</p>"));

        let result = frame(&engine, "f").load("/f").await.unwrap();

        assert_eq!(result, FrameLoad::Loaded { url: "https://app.test/f".to_string() });
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(engine.html(), r#"<turbo-frame id="f"><p>f</p></turbo-frame>"#);
    }

    #[tokio::test]
    async fn test_repeated_loads_reuse_arena_slots() {
        let (engine, transport, _) = setup(r#"<turbo-frame id="f"></turbo-frame>"#);
        transport.respond(Method::Get, "https://app.test/a", TransportResponse::ok("https://app.test/a", "<section><p>a</p></section>"));
        transport.respond(Method::Get, "https://app.test/b", TransportResponse::ok("https://app.test/b", "<article><p>b</p></article>"));
        let f = frame(&engine, "f");

        f.load("/a").await.unwrap();
        f.load("/b").await.unwrap();
        let settled = engine.with_document(Document::arena_len);
        for _ in 0..20 {
            f.load("/a").await.unwrap();
            f.load("/b").await.unwrap();
        }

        assert!(f.is_connected());
        assert!(engine.with_document(Document::arena_len) <= settled * 2);
    }

    #[tokio::test]
    async fn test_render_without_id_does_nothing() {
        let (engine, _, _) = setup(r#"<turbo-frame><p>x</p></turbo-frame>"#);
        let node = engine.with_document(|doc| doc.elements_named("turbo-frame")[0]);

        let result = engine.frame(node).render(r#"<turbo-frame><p>y</p></turbo-frame>"#).unwrap();

        assert_eq!(result, FrameRender::MissingId);
        assert_eq!(engine.html(), r#"<turbo-frame><p>x</p></turbo-frame>"#);
    }

    #[tokio::test]
    async fn test_render_missing_in_response() {
        let (engine, _, _) = setup(PAGE);
        let result = frame(&engine, "inbox").render("<p>nothing here</p>").unwrap();
        assert_eq!(result, FrameRender::NotInResponse);
        assert_eq!(engine.html(), PAGE);
    }

    #[tokio::test]
    async fn test_visit_renders_only_the_frame() {
        let (engine, transport, host) = setup(PAGE);
        transport.respond(
            Method::Get,
            "https://app.test/inbox/2",
            TransportResponse::ok(
                "https://app.test/inbox/2",
                r#"<html><body><h1>Other</h1><turbo-frame id="inbox"><p>new</p></turbo-frame></body></html>"#,
            ),
        );

        let result = frame(&engine, "inbox").visit("/inbox/2", Method::Get, false).await.unwrap();
        assert_eq!(result, FrameRender::Rendered);
        assert_eq!(
            engine.html(),
            r#"<html><body><h1>Page</h1><turbo-frame id="inbox"><p>new</p></turbo-frame></body></html>"#
        );

        assert!(host.pushes().is_empty());
        assert!(host.events().is_empty());
        host.flush_frames();
        assert_eq!(host.events(), vec![LifecycleEvent::Load]);
    }

    #[tokio::test]
    async fn test_stream_submit_uses_processor() {
        let page = r#"<ul id="list"></ul><turbo-frame id="f"><form id="form" method="post" action="/items" data-turbo-stream><input name="t" value="x"></form></turbo-frame>"#;
        let (engine, transport, _) = setup(page);
        transport.respond(
            Method::Post,
            "https://app.test/items",
            TransportResponse::ok(
                "https://app.test/items",
                r#"<turbo-stream action="append" target="list"><template><li>x</li></template></turbo-stream>"#,
            ),
        );

        let form = engine.with_document(|doc| doc.by_id("form")).unwrap();
        let result = frame(&engine, "f").submit(form).await.unwrap();

        assert!(matches!(result, FrameRender::Streamed(report) if report.applied == 1));
        assert!(engine.html().starts_with(r#"<ul id="list"><li>x</li></ul>"#));
    }

    #[tokio::test]
    async fn test_opaque_trigger_is_ignored() {
        let (engine, transport, _) = setup(PAGE);
        let result = frame(&engine, "inbox").handle(&Trigger::Opaque).await.unwrap();
        assert_eq!(result, FrameRender::Ignored);
        assert!(transport.requests().is_empty());
    }
}
