use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors a handler can return. Each kind maps to one HTTP status.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// Carries the plain-text body sent to the client.
    NotFound(String),
    Internal,
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::NotFound(message.into()),
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

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.error_kind {
            ErrorKind::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            ErrorKind::Internal => {
                error!("Internal server error: {:?}", self.source);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Internal,
        }
    }
}

impl From<sse::error::Error> for Error {
    fn from(err: sse::error::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Internal,
        }
    }
}
