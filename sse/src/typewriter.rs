//! Streams a message one character at a time to simulate typing.

use crate::emitter::Emitter;
use crate::error::Error;
use crate::message::PatchEvent;
use log::*;
use std::time::Duration;

/// The first 1..=L characters of `message`, shortest first.
///
/// Prefixes end on `char` boundaries, so multi-byte characters are never split.
pub fn prefixes(message: &str) -> impl Iterator<Item = &str> {
    message
        .char_indices()
        .map(move |(start, c)| &message[..start + c.len_utf8()])
}

/// Emits `render(prefix)` for every prefix of `message`, pausing `delay` after
/// each, then emits `render(message)` once more so the final client state is
/// exactly `message`. A zero delay still produces every step.
///
/// Returns the number of events emitted (characters + 1), or the first error,
/// which is `Disconnected` if the client went away mid-stream.
pub async fn type_out<F>(
    emitter: &Emitter,
    message: &str,
    delay: Duration,
    mut render: F,
) -> Result<usize, Error>
where
    F: FnMut(&str) -> PatchEvent,
{
    let mut emitted = 0;

    for prefix in prefixes(message) {
        emitter.send(render(prefix))?;
        emitted += 1;
        emitter.pause(delay).await?;
    }

    emitter.send(render(message))?;
    emitted += 1;

    debug!("Typed out {} characters in {emitted} events", emitted - 1);
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{PatchElements, PatchEvent};
    use std::time::Instant;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn as_element(text: &str) -> PatchEvent {
        PatchEvent::Elements(PatchElements::new(text))
    }

    fn drain(rx: &mut UnboundedReceiver<PatchEvent>) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let PatchEvent::Elements(patch) = event {
                texts.push(patch.elements);
            }
        }
        texts
    }

    #[test]
    fn test_prefixes_grow_one_character_at_a_time() {
        let all: Vec<&str> = prefixes("Hello").collect();
        assert_eq!(all, vec!["H", "He", "Hel", "Hell", "Hello"]);
    }

    #[test]
    fn test_prefixes_respect_multibyte_characters() {
        let all: Vec<&str> = prefixes("hé🚀").collect();
        assert_eq!(all, vec!["h", "hé", "hé🚀"]);
    }

    #[test]
    fn test_prefixes_of_empty_message_is_empty() {
        assert_eq!(prefixes("").count(), 0);
    }

    #[tokio::test]
    async fn test_emits_every_prefix_then_the_full_message() {
        let (emitter, mut rx) = Emitter::channel();
        let message = "Hello, Elements!";

        let emitted = type_out(&emitter, message, Duration::ZERO, as_element)
            .await
            .unwrap();

        let texts = drain(&mut rx);
        let length = message.chars().count();
        assert_eq!(emitted, length + 1);
        assert_eq!(texts.len(), length + 1);
        for (k, text) in texts.iter().take(length).enumerate() {
            assert_eq!(text.chars().count(), k + 1);
            assert!(message.starts_with(text.as_str()));
        }
        assert_eq!(texts[length - 1], message);
        assert_eq!(texts[length], message);
    }

    #[tokio::test]
    async fn test_empty_message_emits_final_state_once() {
        let (emitter, mut rx) = Emitter::channel();

        let emitted = type_out(&emitter, "", Duration::ZERO, as_element)
            .await
            .unwrap();

        assert_eq!(emitted, 1);
        assert_eq!(drain(&mut rx), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_delay_separates_emissions() {
        let (emitter, _rx) = Emitter::channel();
        let delay = Duration::from_millis(20);

        let started = Instant::now();
        type_out(&emitter, "abc", delay, as_element).await.unwrap();

        // One pause after each of the three prefixes
        assert!(started.elapsed() >= delay * 3);
    }

    #[tokio::test]
    async fn test_zero_delay_is_not_throttled() {
        let (emitter, _rx) = Emitter::channel();
        let message = "x".repeat(500);

        let started = Instant::now();
        let emitted = type_out(&emitter, &message, Duration::ZERO, as_element)
            .await
            .unwrap();

        assert_eq!(emitted, 501);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_disconnect_before_start_emits_nothing() {
        let (emitter, rx) = Emitter::channel();
        drop(rx);

        let err = type_out(&emitter, "Hello", Duration::ZERO, as_element)
            .await
            .unwrap_err();
        assert!(err.is_disconnected());
    }

    #[tokio::test]
    async fn test_disconnect_mid_stream_stops_promptly() {
        let (emitter, mut rx) = Emitter::channel();

        let reader = tokio::spawn(async move {
            let first = rx.recv().await;
            drop(rx);
            first
        });

        let started = Instant::now();
        let result = type_out(&emitter, "Hello", Duration::from_secs(30), as_element).await;

        assert!(result.unwrap_err().is_disconnected());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(reader.await.unwrap(), Some(as_element("H")));
    }
}
