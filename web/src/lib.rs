use axum::http::{HeaderValue, Method};
use log::*;
pub use service::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod controller;
mod error;
mod extractors;
mod middleware;
pub mod router;
mod sse;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_address = app_state.config.server_address();
    let cors_layer = cors_layer(&app_state.config.allowed_origins);

    let listener = TcpListener::bind(&server_address).await?;
    info!("Server starting... listening for connections on http://{server_address}");

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn preflight(origins: &[String], origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/health", get(|| async { "healthy" }))
            .layer(cors_layer(origins));
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/health")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .cloned()
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let origins = vec!["http://localhost:4000".to_string()];
        assert_eq!(
            preflight(&origins, "http://localhost:4000").await.unwrap(),
            "http://localhost:4000"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_other_and_invalid_origins() {
        let origins = vec!["bad\norigin".to_string(), "http://localhost:4000".to_string()];
        assert!(preflight(&origins, "http://evil.example").await.is_none());
    }

    #[tokio::test]
    async fn test_cors_wildcard_allows_any_origin() {
        let origins = vec!["*".to_string()];
        assert_eq!(
            preflight(&origins, "http://anywhere.example").await.unwrap(),
            "*"
        );
    }
}
