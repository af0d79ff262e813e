//! Error types for the `sse` crate.
use std::error::Error as StdError;
use std::fmt;

/// Errors raised while building or emitting patch events.
///
/// `Disconnected` is the expected way for a stream to end early: the client
/// went away and the receiving half of the response stream was dropped.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The response stream is closed; nothing more can be written to it.
    Disconnected,
    /// A signal patch payload did not serialize to a JSON object.
    InvalidSignals,
    Serialization,
}

impl Error {
    pub fn disconnected() -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Disconnected,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.error_kind == ErrorKind::Disconnected
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.error_kind {
            ErrorKind::Disconnected => write!(f, "SSE Error: response stream disconnected"),
            ErrorKind::InvalidSignals => {
                write!(f, "SSE Error: signal patches must be JSON objects")
            }
            ErrorKind::Serialization => write!(f, "SSE Error: {self:?}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Serialization,
        }
    }
}
