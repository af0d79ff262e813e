use async_stream::stream;
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::Stream;
use log::*;
use sse::message::PatchEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Wraps the receiving end of an emitter as an SSE response.
///
/// Every patch event becomes its own SSE frame as soon as it arrives. The
/// response ends once the emitting task drops its `Emitter`; dropping the
/// response (client disconnect) closes the channel and stops that task.
pub(crate) fn patch_stream(
    rx: UnboundedReceiver<PatchEvent>,
    keep_alive: Duration,
) -> impl IntoResponse {
    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(events(rx)).keep_alive(KeepAlive::new().interval(keep_alive)),
    )
}

fn events(
    mut rx: UnboundedReceiver<PatchEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        while let Some(patch) = rx.recv().await {
            yield Ok(patch.to_sse_event());
        }

        trace!("Patch stream drained");
    }
}
