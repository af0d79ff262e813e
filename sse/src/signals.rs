use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Name of the query parameter Datastar uses to send signals with GET requests.
pub const DATASTAR_QUERY_PARAM: &str = "datastar";

/// Client signals read by the streaming handlers. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Signals {
    /// Milliseconds to wait between emissions.
    #[serde(default)]
    pub delay: Option<f64>,
}

impl Signals {
    /// The inter-emission delay. Anything that is not a finite, positive,
    /// representable number of milliseconds counts as no delay.
    pub fn delay(&self) -> Duration {
        match self.delay {
            Some(ms) if ms.is_finite() && ms > 0.0 => {
                Duration::try_from_secs_f64(ms / 1000.0).unwrap_or_else(|e| {
                    warn!("Ignoring unrepresentable delay of {ms}ms: {e}");
                    Duration::ZERO
                })
            }
            _ => Duration::ZERO,
        }
    }
}

/// Parses a signals payload, falling back to `T::default()` when the payload
/// is empty or malformed. Never fails: bad signals must not abort a stream.
pub fn parse<T>(raw: &[u8]) -> T
where
    T: DeserializeOwned + Default,
{
    if raw.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }

    match serde_json::from_slice(raw) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Malformed signals payload, using defaults: {e}");
            T::default()
        }
    }
}
