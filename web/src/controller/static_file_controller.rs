use crate::error::{Error as WebError, Result as WebResult};
use crate::middleware::request_context::RequestContext;
use crate::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Extension;
use log::*;
use std::io::ErrorKind;

pub(crate) const INDEX_FILE: &str = "hello-world.html";

/// GET the demo page
#[utoipa::path(
    get,
    path = "/index.html",
    responses(
        (status = 200, description = "The demo HTML page", content_type = "text/html", body = String),
        (status = 404, description = "The HTML file is missing from the asset directory", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn serve_index(
    State(app_state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> WebResult<impl IntoResponse> {
    info!("{context} processed a request to serve HTML");

    let path = app_state.config.asset_dir().join(INDEX_FILE);
    match tokio::fs::read(&path).await {
        Ok(contents) => Ok((
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            contents,
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("HTML file not found at: {}", path.display());
            Err(WebError::not_found("HTML file not found."))
        }
        Err(e) => {
            error!("Failed to read HTML file at {}: {e}", path.display());
            Err(e.into())
        }
    }
}
