use anyhow::Result;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    /// Data lines with the `data: ` prefix already removed.
    pub lines: Vec<String>,
    pub received_at: Instant,
}

impl Event {
    /// The value of the first data line starting with `key `.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find_map(|line| line.strip_prefix(key)?.strip_prefix(' '))
    }
}

/// Opens `path` as an SSE stream and collects every event until the server
/// closes it, or until `timeout` elapses.
pub async fn collect(base_url: &str, path: &str, delay_ms: u64, timeout: Duration) -> Result<Vec<Event>> {
    // {"delay":N} in the query parameter Datastar uses for GET requests
    let url = format!("{base_url}{path}?datastar=%7B%22delay%22%3A{delay_ms}%7D");
    debug!("Connecting to {url}");

    let client = es::ClientBuilder::for_url(&url)?
        .reconnect(es::ReconnectOptions::reconnect(false).build())
        .build();
    let mut stream = client.stream();
    let deadline = Instant::now() + timeout;
    let mut events = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            anyhow::bail!("Timed out after {} events from {path}", events.len());
        }

        match tokio::time::timeout(remaining, stream.next()).await {
            Ok(Some(Ok(es::SSE::Event(event)))) => events.push(Event {
                event_type: event.event_type,
                lines: event.data.lines().map(String::from).collect(),
                received_at: Instant::now(),
            }),
            Ok(Some(Ok(_))) => {
                // Ignore comments (keep-alive)
            }
            Ok(Some(Err(es::Error::Eof))) | Ok(None) => {
                debug!("SSE stream ended for {path}");
                return Ok(events);
            }
            Ok(Some(Err(e))) => {
                anyhow::bail!("SSE error on {path}: {e:?}");
            }
            Err(_) => {
                anyhow::bail!("Timed out after {} events from {path}", events.len());
            }
        }
    }
}
