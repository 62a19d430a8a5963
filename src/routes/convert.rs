//! Conversion route
//!
//! POST /api/v1/convert - Submit one file, receive a conversion outcome.
//! The body is multipart form data with a single `file` field. Responses
//! always carry a `ConversionResult` body, success or failure, with the
//! HTTP status mirroring the failure kind.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};

use super::bearer_token;
use crate::convert::types::{ConversionResult, UploadSubmission};
use crate::convert::ConvertError;
use crate::state::AppState;

/// Create the conversion router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(convert))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
}

/// POST /api/v1/convert
///
/// Authentication is checked before anything else; an unauthenticated
/// request never reaches the pipeline.
async fn convert(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> (StatusCode, Json<ConversionResult>) {
    let token = bearer_token(&headers);
    if state.authenticator().current_account(token).await.is_none() {
        return failure(&ConvertError::Unauthenticated);
    }

    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(err) => return failure(&err),
    };

    match state.pipeline().try_convert(&submission).await {
        Ok(artifact) => {
            tracing::info!(
                source = %submission.file_name,
                artifact = %artifact.file_name,
                size = artifact.size,
                "Conversion complete"
            );
            (StatusCode::OK, Json(ConversionResult::ok(artifact)))
        }
        Err(err) => {
            tracing::warn!(
                source = %submission.file_name,
                code = err.code(),
                error = %err,
                "Conversion failed"
            );
            failure(&err)
        }
    }
}

fn failure(err: &ConvertError) -> (StatusCode, Json<ConversionResult>) {
    (err.status_code(), Json(ConversionResult::failed(err)))
}

/// Pull the `file` field out of the multipart body
///
/// A request without a `file` field, or with a body the multipart parser
/// cannot read, is treated the same as a zero-byte upload: there is
/// nothing to convert. `MalformedSource` stays reserved for document
/// content the extractor rejects.
async fn read_submission(mut multipart: Multipart) -> Result<UploadSubmission, ConvertError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(error = %e, "Unreadable multipart body");
        ConvertError::EmptySubmission
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Truncated multipart field");
                ConvertError::EmptySubmission
            })?
            .to_vec();

        return Ok(UploadSubmission {
            file_name,
            content_type,
            data,
        });
    }

    Err(ConvertError::EmptySubmission)
}
