//! SSE response plumbing for the web layer.
//!
//! Handlers build patch events with `sse::Emitter`; this module turns the
//! receiving end of an emitter into a streaming HTTP response. The patch
//! model itself lives in the `sse` crate.

pub mod handler;
