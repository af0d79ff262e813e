use crate::error::{Error, ErrorKind};
use crate::message::{ExecuteScript, PatchElements, PatchEvent, PatchSignals};
use log::*;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Writes patch events onto one response stream.
///
/// The receiving half is owned by the HTTP response. When the client goes
/// away the response body is dropped with it, and every later call here
/// returns a `Disconnected` error.
#[derive(Debug, Clone)]
pub struct Emitter {
    sender: UnboundedSender<PatchEvent>,
}

impl Emitter {
    pub fn new(sender: UnboundedSender<PatchEvent>) -> Self {
        Self { sender }
    }

    /// Creates an emitter together with the receiver that feeds the response.
    pub fn channel() -> (Self, UnboundedReceiver<PatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn send(&self, event: PatchEvent) -> Result<(), Error> {
        trace!("Emitting {:?} patch", event.mode());
        self.sender.send(event).map_err(|_| Error::disconnected())
    }

    /// Patches DOM content identified by the fragment's root element id.
    pub fn patch_elements(&self, elements: impl Into<String>) -> Result<(), Error> {
        self.send(PatchEvent::Elements(PatchElements::new(elements)))
    }

    /// Merges the given key/value pairs into the client's signal store.
    pub fn patch_signals<T: Serialize>(&self, signals: &T) -> Result<(), Error> {
        let signals = serde_json::to_value(signals)?;
        if !signals.is_object() {
            return Err(Error {
                source: None,
                error_kind: ErrorKind::InvalidSignals,
            });
        }

        self.send(PatchEvent::Signals(PatchSignals {
            signals,
            only_if_missing: false,
        }))
    }

    /// Has the client run `script` once.
    pub fn execute_script(&self, script: impl Into<String>) -> Result<(), Error> {
        self.send(PatchEvent::Script(ExecuteScript::new(script)))
    }

    /// Sleeps for `delay` without blocking the runtime, returning early with
    /// `Disconnected` if the response stream closes in the meantime.
    pub async fn pause(&self, delay: Duration) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::disconnected());
        }
        if delay.is_zero() {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = self.sender.closed() => Err(Error::disconnected()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::PatchMode;
    use serde_json::json;
    use std::time::Instant;

    #[test]
    fn test_each_operation_emits_exactly_one_event_in_call_order() {
        let (emitter, mut rx) = Emitter::channel();

        emitter.patch_signals(&json!({"a": 1})).unwrap();
        emitter.patch_elements(r#"<div id="x"></div>"#).unwrap();
        emitter.execute_script("alert(1)").unwrap();
        drop(emitter);

        let mut modes = Vec::new();
        while let Ok(event) = rx.try_recv() {
            modes.push(event.mode());
        }
        assert_eq!(
            modes,
            vec![PatchMode::Signals, PatchMode::Elements, PatchMode::Script]
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_is_disconnected() {
        let (emitter, rx) = Emitter::channel();
        drop(rx);

        let err = emitter.patch_elements("<p id=\"p\"></p>").unwrap_err();
        assert!(err.is_disconnected());
        assert!(emitter.is_closed());
    }

    #[test]
    fn test_non_object_signals_are_rejected() {
        let (emitter, mut rx) = Emitter::channel();

        let err = emitter.patch_signals(&vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::InvalidSignals);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_pause_zero_does_not_sleep() {
        let (emitter, _rx) = Emitter::channel();

        let started = Instant::now();
        emitter.pause(Duration::ZERO).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_waits_at_least_the_delay() {
        let (emitter, _rx) = Emitter::channel();

        let started = Instant::now();
        emitter.pause(Duration::from_millis(30)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_pause_ends_early_when_client_disconnects() {
        let (emitter, rx) = Emitter::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(rx);
        });

        let started = Instant::now();
        let result = emitter.pause(Duration::from_secs(30)).await;
        assert!(result.unwrap_err().is_disconnected());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
