//! Scripted collaborators for tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::history::ScrollPosition;
use crate::host::{FrameCallback, Host, LifecycleEvent};
use crate::http::{Method, RequestDescriptor, Transport, TransportResponse};
use crate::identifiers::SnapshotId;

// ============================================================================
// Logging
// ============================================================================

/// Installs a test subscriber once; `RUST_LOG` overrides the filter.
pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("turbo_morph=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// MockTransport
// ============================================================================

/// Transport answering from per-route queues. The last queued response of
/// a route repeats; unknown routes fail.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<FxHashMap<(Method, String), VecDeque<TransportResponse>>>,
    delays: Mutex<FxHashMap<String, Duration>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `response` for `method url`.
    pub fn respond(&self, method: Method, url: &str, response: TransportResponse) {
        self.routes
            .lock()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Delays every response for `url`.
    pub fn delay(&self, url: &str, delay: Duration) {
        self.delays.lock().insert(url.to_string(), delay);
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: &RequestDescriptor) -> Result<TransportResponse> {
        self.requests.lock().push(request.clone());

        let delay = self.delays.lock().get(&request.url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut routes = self.routes.lock();
        let queue = routes
            .get_mut(&(request.method, request.url.clone()))
            .ok_or_else(|| Error::transport(&request.url, "no scripted response"))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::transport(&request.url, "no scripted response"))
    }
}

// ============================================================================
// MockHost
// ============================================================================

#[derive(Default)]
struct HostState {
    location: String,
    cookies: String,
    scroll: ScrollPosition,
    scrolled_to: Vec<ScrollPosition>,
    pushes: Vec<(SnapshotId, String)>,
    replaces: Vec<SnapshotId>,
    reloads: Vec<String>,
    events: Vec<LifecycleEvent>,
    frames: Vec<FrameCallback>,
}

/// Host that records every call. Animation frames run on `flush_frames`.
pub(crate) struct MockHost {
    state: Mutex<HostState>,
}

impl MockHost {
    pub fn new(location: &str) -> Self {
        Self {
            state: Mutex::new(HostState {
                location: location.to_string(),
                ..HostState::default()
            }),
        }
    }

    pub fn set_cookies(&self, cookies: &str) {
        self.state.lock().cookies = cookies.to_string();
    }

    pub fn set_scroll(&self, x: f64, y: f64) {
        self.state.lock().scroll = ScrollPosition::new(x, y);
    }

    pub fn pushes(&self) -> Vec<(SnapshotId, String)> {
        self.state.lock().pushes.clone()
    }

    pub fn replaces(&self) -> Vec<SnapshotId> {
        self.state.lock().replaces.clone()
    }

    pub fn reloads(&self) -> Vec<String> {
        self.state.lock().reloads.clone()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.state.lock().events.clone()
    }

    pub fn scrolled_to(&self) -> Vec<ScrollPosition> {
        self.state.lock().scrolled_to.clone()
    }

    /// Runs every pending animation frame callback.
    pub fn flush_frames(&self) {
        let callbacks = std::mem::take(&mut self.state.lock().frames);
        for callback in callbacks {
            callback();
        }
    }
}

impl Host for MockHost {
    fn location(&self) -> String {
        self.state.lock().location.clone()
    }

    fn cookies(&self) -> String {
        self.state.lock().cookies.clone()
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.state.lock().scroll
    }

    fn scroll_to(&self, position: ScrollPosition) {
        let mut state = self.state.lock();
        state.scroll = position;
        state.scrolled_to.push(position);
    }

    fn push_state(&self, state: SnapshotId, url: &str) {
        let mut host = self.state.lock();
        host.pushes.push((state, url.to_string()));
        host.location = url.to_string();
    }

    fn replace_state(&self, state: SnapshotId) {
        self.state.lock().replaces.push(state);
    }

    fn reload(&self, url: &str) {
        self.state.lock().reloads.push(url.to_string());
    }

    fn dispatch(&self, event: LifecycleEvent) {
        self.state.lock().events.push(event);
    }

    fn request_animation_frame(&self, callback: FrameCallback) {
        self.state.lock().frames.push(callback);
    }
}
