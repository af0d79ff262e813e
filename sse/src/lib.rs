//! Datastar patch streaming over Server-Sent Events.
//!
//! This crate holds everything a handler needs to drive a Datastar client
//! without any HTTP routing concerns:
//!
//! - `message`: the `PatchEvent` model and its rendering to SSE events
//!   (`datastar-patch-elements` / `datastar-patch-signals`).
//! - `emitter`: `Emitter`, the write side of one response stream. Each call
//!   produces exactly one event; a closed stream surfaces as `Disconnected`.
//! - `signals`: lenient parsing of client signals (`Signals { delay }`).
//! - `typewriter`: the pacing loop that streams a message prefix by prefix.
//!
//! # Example: streaming from a handler
//!
//! ```rust,ignore
//! use sse::{typewriter, Emitter};
//!
//! let (emitter, rx) = Emitter::channel();
//! tokio::spawn(async move {
//!     emitter.patch_signals(&json!({ "show_patch_element_message": true }))?;
//!     typewriter::type_out(&emitter, "Hello", signals.delay(), |prefix| {
//!         PatchEvent::Elements(PatchElements::new(format!(r#"<div id="message">{prefix}</div>"#)))
//!     })
//!     .await
//! });
//! // `rx` becomes the body of the SSE response
//! ```

pub mod emitter;
pub mod error;
pub mod message;
pub mod signals;
pub mod typewriter;

pub use emitter::Emitter;
pub use signals::Signals;
