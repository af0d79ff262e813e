use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use log::*;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Per-request handles made available to handlers through
/// `Extension<RequestContext>`.
///
/// The context is stored in the request's own extensions, so it is dropped
/// with the request and no other request can ever observe it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub id: Uuid,
    pub method: Method,
    pub path: String,
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {} {}", self.id, self.method, self.path)
    }
}

/// Attaches a fresh `RequestContext` to every inbound request and echoes its
/// id back in the `x-request-id` response header.
pub async fn attach_request_context(mut request: Request, next: Next) -> Response {
    let context = RequestContext {
        id: Uuid::new_v4(),
        method: request.method().clone(),
        path: request.uri().path().to_string(),
    };
    let started = Instant::now();
    debug!("{context} received");

    request.extensions_mut().insert(context.clone());
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&context.id.to_string()) {
        response.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }

    debug!(
        "{context} responded {} in {}ms",
        response.status(),
        started.elapsed().as_millis()
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn,
        routing::get,
        Extension, Router,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    async fn whoami(Extension(context): Extension<RequestContext>) -> String {
        // Give a concurrent request the chance to interleave
        tokio::time::sleep(Duration::from_millis(20)).await;
        format!("{} {}", context.id, context.path)
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami/{name}", get(whoami))
            .layer(from_fn(attach_request_context))
    }

    async fn call(app: Router, uri: &str) -> (String, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let header = response
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_handler_sees_its_own_context() {
        let (header, body) = call(app(), "/whoami/alice").await;
        assert_eq!(body, format!("{header} /whoami/alice"));
    }

    #[tokio::test]
    async fn test_concurrent_requests_never_share_context() {
        let app = app();
        let (first, second) = tokio::join!(
            call(app.clone(), "/whoami/first"),
            call(app.clone(), "/whoami/second")
        );

        assert_eq!(first.1, format!("{} /whoami/first", first.0));
        assert_eq!(second.1, format!("{} /whoami/second", second.0));
        assert_ne!(first.0, second.0);
    }

    #[tokio::test]
    async fn test_handler_without_context_layer_is_rejected() {
        let app = Router::new().route("/whoami/{name}", get(whoami));
        let request = Request::builder()
            .uri("/whoami/nobody")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
