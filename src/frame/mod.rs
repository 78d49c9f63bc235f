//! Scoped frames.
//!
//! A frame is a `<turbo-frame id="…">` element that loads and reloads its
//! own content. Clicks and submits inside it are handled by the frame and
//! only ever touch its subtree; frames never write history.
//!
//! | Operation | Behaviour |
//! |-----------|-----------|
//! | [`Frame::load`] | `get` the URL, follow redirects, morph children against the response body; 404 leaves the frame as is |
//! | [`Frame::render`] | Morph the frame against the same-id element of a response |
//! | [`Frame::visit`] / [`Frame::submit`] | Request, follow redirects as `get`, render, then schedule `turbo:load` |

mod controller;

pub use controller::{Frame, FrameLoad, FrameRender};
