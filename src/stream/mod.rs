//! Declarative stream patches.
//!
//! A stream document is a fragment of `<turbo-stream>` elements, each
//! naming an action, one or more targets and a `<template>` of content:
//!
//! ```text
//! <turbo-stream action="append" target="messages">
//!   <template><li id="m42">Hello</li></template>
//! </turbo-stream>
//! ```
//!
//! [`StreamProcessor::apply`] runs every instruction against the live
//! document in order. Missing targets and unknown actions are skipped;
//! only malformed markup and invalid selectors fail the whole document.

mod action;
mod processor;

pub use action::StreamAction;
pub use processor::{StreamProcessor, StreamReport};
