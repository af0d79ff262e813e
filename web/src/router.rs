use crate::{
    controller::{datastar_controller, health_check_controller, static_file_controller},
    middleware::request_context::attach_request_context,
    AppState,
};
use axum::{middleware::from_fn, routing::get, Router};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Datastar Functions"
        ),
        paths(
            datastar_controller::stream_element_patches,
            datastar_controller::stream_signal_patches,
            datastar_controller::execute_script,
            static_file_controller::serve_index,
            health_check_controller::health_check,
        ),
        tags(
            (name = "datastar_functions", description = "Datastar SSE patch streaming examples")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(datastar_routes(app_state.clone()))
        .merge(static_routes(app_state))
        .merge(health_routes())
        .layer(from_fn(attach_request_context))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn datastar_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/stream-element-patches",
            get(datastar_controller::stream_element_patches)
                .post(datastar_controller::stream_element_patches),
        )
        .route(
            "/stream-signal-patches",
            get(datastar_controller::stream_signal_patches)
                .post(datastar_controller::stream_signal_patches),
        )
        .route(
            "/execute-script",
            get(datastar_controller::execute_script).post(datastar_controller::execute_script),
        )
        .with_state(app_state)
}

// A single fixed file; no path is ever taken from the client
fn static_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/index.html", get(static_file_controller::serve_index))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
