//! Artifact retrieval route
//!
//! GET /files/:name - Download a published artifact by name.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new().route("/:name", get(download))
}

/// GET /files/:name
async fn download(State(state): State<AppState>, Path(name): Path<String>) -> Result<Response> {
    let bytes = state
        .store()
        .retrieve(&name)
        .await
        .map_err(|e| {
            tracing::error!(name = %name, error = %e, "Artifact read failed");
            AppError::Internal("Failed to read artifact".to_string())
        })?
        .ok_or(AppError::NotFound(format!("No artifact named {}", name)))?;

    let mime = mime_guess::from_path(&name).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", name),
            ),
        ],
        bytes,
    )
        .into_response())
}
