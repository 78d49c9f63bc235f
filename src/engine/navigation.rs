//! Event routing and the page-level visit/submit pipeline.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, info};

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::host::LifecycleEvent;
use crate::http::{Method, RequestDescriptor, RequestNegotiable};
use crate::identifiers::{NodeId, SnapshotId};

use super::core::Engine;
use super::events::{Dispatch, DomEvent, Trigger};

// ============================================================================
// Engine - Event Routing
// ============================================================================

impl Engine {
    /// Handles one browser event to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] / [`Error::TooManyRedirects`] from the request
    /// - [`Error::Parse`] / [`Error::InvalidSelector`] from the response
    ///
    /// On error the document keeps its last rendered state. History
    /// restore failures never surface here; they fall back to a reload.
    pub async fn dispatch(&self, event: DomEvent) -> Result<Dispatch> {
        debug!(event = ?event, "Dispatching event");
        match event {
            DomEvent::Click { target } => self.on_click(target).await,
            DomEvent::Submit { target } => self.on_submit(target).await,
            DomEvent::PopState { state } => Ok(self.history_pop(state).await),
            DomEvent::Load => {
                self.inner.session.host.dispatch(LifecycleEvent::Load);
                Ok(Dispatch::Loaded)
            }
        }
    }

    async fn on_click(&self, target: NodeId) -> Result<Dispatch> {
        let (link, owner) = {
            let document = self.inner.session.document.lock();
            let Trigger::Link { element } = Trigger::classify(&document, target) else {
                return Ok(Dispatch::Ignored);
            };
            if self.opted_out(&document, element) {
                debug!(link = %element, "Link opted out");
                return Ok(Dispatch::Ignored);
            }
            (element, self.owning_frame(&document, element))
        };

        if let Some(frame) = owner {
            return self.route_to_frame(frame, Trigger::Link { element: link }).await;
        }

        self.inner.session.capture();
        let request = self.build_request(link, None)?;
        self.navigate(request, false).await
    }

    async fn on_submit(&self, target: NodeId) -> Result<Dispatch> {
        let (form, owner) = {
            let document = self.inner.session.document.lock();
            let Some(form) = document.closest_named(target, "form") else {
                return Ok(Dispatch::Ignored);
            };
            if self.opted_out(&document, form) {
                debug!(form = %form, "Form opted out");
                return Ok(Dispatch::Ignored);
            }
            (form, self.owning_frame(&document, form))
        };

        if let Some(frame) = owner {
            return self.route_to_frame(frame, Trigger::Form { element: form }).await;
        }
        self.submit(form).await
    }

    async fn route_to_frame(&self, frame: NodeId, trigger: Trigger) -> Result<Dispatch> {
        debug!(frame = %frame, trigger = ?trigger, "Routing event to frame");
        let outcome = self.frame(frame).handle(&trigger).await?;
        debug!(frame = %frame, outcome = ?outcome, "Frame handled event");
        self.connect_frames().await;
        Ok(Dispatch::Frame(frame))
    }

    /// Nearest element carrying the opt-out attribute decides; `"false"`
    /// opts out.
    fn opted_out(&self, document: &Document, element: NodeId) -> bool {
        let attribute = &self.inner.session.config.opt_out_attribute;
        document
            .closest(element, |e| e.has_attr(attribute))
            .and_then(|node| document.element(node))
            .and_then(|e| e.attr(attribute))
            .is_some_and(|value| value == "false")
    }

    /// Nearest enclosing frame element.
    fn owning_frame(&self, document: &Document, element: NodeId) -> Option<NodeId> {
        let tag = &self.inner.session.config.frame_tag;
        document.closest_named(element, tag)
    }
}

// ============================================================================
// Engine - Visit / Submit
// ============================================================================

impl Engine {
    /// Snapshots the current page into the current history entry.
    pub fn capture(&self) -> SnapshotId {
        self.inner.session.capture()
    }

    /// Visits `url` at page level.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn visit(&self, url: &str, method: Method, stream: bool) -> Result<Dispatch> {
        self.inner.session.capture();
        let request = self.url_request(url, method, stream);
        self.navigate(request, method != Method::Get).await
    }

    /// Submits `form` at page level.
    ///
    /// Stream submissions skip the pre-capture unless
    /// `capture_stream_submissions` is set.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNode`] if `form` is not an element, otherwise same
    /// as [`dispatch`](Self::dispatch).
    pub async fn submit(&self, form: NodeId) -> Result<Dispatch> {
        let request = self.build_request(form, None)?;
        if !request.stream || self.inner.session.config.capture_stream_submissions {
            self.inner.session.capture();
        }
        self.navigate(request, true).await
    }

    /// Requests, follows redirects and renders one navigation.
    async fn navigate(&self, mut request: RequestDescriptor, mut submission: bool) -> Result<Dispatch> {
        let session = &self.inner.session;
        let limit = session.config.max_redirects;
        let mut hops = 0;
        let mut redirected = false;

        let response = loop {
            let response = self.fetch(&request).await?;

            if response.redirected && response.final_url == request.url {
                // the transport's own redirect chain ended where it started
                debug!(url = %request.url, "Redirect landed on the requested url");
                redirected = true;
                break response;
            }

            if response.is_redirect() {
                hops += 1;
                if hops > limit {
                    return Err(Error::too_many_redirects(response.final_url, limit));
                }
                debug!(from = %request.url, to = %response.final_url, "Following redirect as get");
                request = request.follow_redirect(response.final_url);
                redirected = true;
                continue;
            }

            if submission && response.is_no_content() {
                debug!(url = %request.url, "Submission returned 204, visiting");
                request = request.follow_redirect(request.url.clone());
                submission = false;
                continue;
            }

            break response;
        };

        let dispatch = if request.stream && !redirected {
            let report = session.apply_stream(&response.body)?;
            info!(url = %request.url, applied = report.applied, "Stream rendered");
            Dispatch::Streamed(report)
        } else {
            let source = Document::parse(&response.body)?;
            let url = response.final_url;
            let id = session
                .history
                .save(url.clone(), response.body, session.host.scroll_position());
            session.host.push_state(id, &url);
            session.render_document(&source)?;
            info!(url = %url, snapshot_id = %id, "Page rendered");
            Dispatch::Page { url }
        };

        session.schedule_load();
        self.connect_frames().await;
        Ok(dispatch)
    }
}

// ============================================================================
// Tests
// ============================================================================
