use crate::extractors::signals::ReadSignals;
use crate::middleware::request_context::RequestContext;
use crate::sse::handler::patch_stream;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Extension;
use log::*;
use serde_json::json;
use sse::error::Error as SseError;
use sse::message::{PatchElements, PatchEvent, PatchSignals};
use sse::{typewriter, Emitter, Signals};
use std::future::Future;

pub(crate) const ELEMENTS_MESSAGE: &str = "Hello, Elements!";
pub(crate) const SIGNALS_MESSAGE: &str = "Hello, Signals!";
pub(crate) const SCRIPT: &str = "alert('Hello! from the server 🚀')";

/// GET|POST stream the message into `#message` one character at a time
#[utoipa::path(
    method(get, post),
    path = "/stream-element-patches",
    request_body(content = String, description = "Signals, e.g. {\"delay\": 50}", content_type = "application/json"),
    responses(
        (status = 200, description = "Element patch stream", content_type = "text/event-stream", body = String),
    )
)]
pub async fn stream_element_patches(
    State(app_state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ReadSignals(signals): ReadSignals<Signals>,
) -> impl IntoResponse {
    info!("{context} processed a request for element patches");

    let (emitter, rx) = Emitter::channel();
    spawn_emitter(context, element_patches(emitter, signals));

    patch_stream(rx, app_state.config.keep_alive())
}

/// GET|POST stream the message into the `signals_message` signal one character at a time
#[utoipa::path(
    method(get, post),
    path = "/stream-signal-patches",
    request_body(content = String, description = "Signals, e.g. {\"delay\": 50}", content_type = "application/json"),
    responses(
        (status = 200, description = "Signal patch stream", content_type = "text/event-stream", body = String),
    )
)]
pub async fn stream_signal_patches(
    State(app_state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ReadSignals(signals): ReadSignals<Signals>,
) -> impl IntoResponse {
    info!("{context} processed a request for signal patches");

    let (emitter, rx) = Emitter::channel();
    spawn_emitter(context, signal_patches(emitter, signals));

    patch_stream(rx, app_state.config.keep_alive())
}

/// GET|POST run a script on the client once
#[utoipa::path(
    method(get, post),
    path = "/execute-script",
    responses(
        (status = 200, description = "A single script execution event", content_type = "text/event-stream", body = String),
    )
)]
pub async fn execute_script(
    State(app_state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> impl IntoResponse {
    info!("{context} processed a request for script execution");

    let (emitter, rx) = Emitter::channel();
    if let Err(e) = emitter.execute_script(SCRIPT) {
        debug!("{context} closed before the script was sent: {e}");
    }

    patch_stream(rx, app_state.config.keep_alive())
}

async fn element_patches(emitter: Emitter, signals: Signals) -> Result<usize, SseError> {
    emitter.patch_signals(&json!({ "show_patch_element_message": true }))?;

    typewriter::type_out(&emitter, ELEMENTS_MESSAGE, signals.delay(), |prefix| {
        PatchEvent::Elements(PatchElements::new(format!(
            r#"<div id="message">{prefix}</div>"#
        )))
    })
    .await
}

async fn signal_patches(emitter: Emitter, signals: Signals) -> Result<usize, SseError> {
    emitter.patch_signals(&json!({ "show_patch_element_message": false }))?;

    typewriter::type_out(&emitter, SIGNALS_MESSAGE, signals.delay(), |prefix| {
        PatchEvent::Signals(PatchSignals {
            signals: json!({ "signals_message": prefix }),
            only_if_missing: false,
        })
    })
    .await
}

/// Runs an emission task in the background so the response can start
/// streaming immediately. A disconnect ends the task quietly.
fn spawn_emitter<F>(context: RequestContext, task: F)
where
    F: Future<Output = Result<usize, SseError>> + Send + 'static,
{
    tokio::spawn(async move {
        match task.await {
            Ok(count) => debug!("{context} streamed {count} patches"),
            Err(e) if e.is_disconnected() => {
                debug!("{context} client disconnected, stopping stream")
            }
            Err(e) => error!("{context} stream aborted: {e}"),
        }
    });
}
