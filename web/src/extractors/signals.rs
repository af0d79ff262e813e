use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use axum::http::Method;
use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sse::signals::{self, DATASTAR_QUERY_PARAM};
use std::convert::Infallible;

#[derive(Deserialize)]
struct DatastarQuery {
    #[serde(rename = "datastar")]
    signals: Option<String>,
}

/// Reads Datastar signals from the request.
///
/// Non-GET requests carry them as a JSON body; GET requests carry them in the
/// `datastar` query parameter. Missing or malformed signals resolve to
/// `T::default()`, so this extractor never rejects.
#[derive(Debug, Clone, Default)]
pub struct ReadSignals<T>(pub T);

impl<S, T> FromRequest<S> for ReadSignals<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<DatastarQuery>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(q)| q.signals);

        let body = if req.method() == Method::GET {
            None
        } else {
            match Bytes::from_request(req, state).await {
                Ok(bytes) if !bytes.is_empty() => Some(bytes),
                Ok(_) => None,
                Err(rejection) => {
                    warn!("Could not read signals body: {rejection}");
                    None
                }
            }
        };

        let signals = match (body, query) {
            (Some(bytes), _) => signals::parse(&bytes),
            (None, Some(raw)) => signals::parse(raw.as_bytes()),
            (None, None) => {
                trace!("No {DATASTAR_QUERY_PARAM} signals supplied");
                T::default()
            }
        };

        Ok(ReadSignals(signals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use sse::Signals;

    async fn extract(request: Request<Body>) -> Signals {
        let ReadSignals(signals) = ReadSignals::<Signals>::from_request(request, &())
            .await
            .unwrap();
        signals
    }

    #[tokio::test]
    async fn test_post_body_signals() {
        let request = Request::builder()
            .method("POST")
            .uri("/stream-element-patches")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"delay": 50}"#))
            .unwrap();

        assert_eq!(extract(request).await.delay, Some(50.0));
    }

    #[tokio::test]
    async fn test_get_query_signals() {
        let request = Request::builder()
            .method("GET")
            .uri("/stream-element-patches?datastar=%7B%22delay%22%3A25%7D")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(request).await.delay, Some(25.0));
    }

    #[tokio::test]
    async fn test_post_without_body_falls_back_to_query() {
        let request = Request::builder()
            .method("POST")
            .uri("/stream-signal-patches?datastar=%7B%22delay%22%3A5%7D")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(request).await.delay, Some(5.0));
    }

    #[tokio::test]
    async fn test_no_signals_resolve_to_default() {
        let request = Request::builder()
            .method("GET")
            .uri("/stream-signal-patches")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(request).await, Signals::default());
    }

    #[tokio::test]
    async fn test_malformed_body_resolves_to_default() {
        let request = Request::builder()
            .method("POST")
            .uri("/stream-signal-patches")
            .body(Body::from("{delay:"))
            .unwrap();

        assert_eq!(extract(request).await, Signals::default());
    }
}
