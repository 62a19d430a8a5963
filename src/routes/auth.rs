//! Authentication routes
//!
//! Endpoints:
//! - POST /api/v1/auth/register - Create an account
//! - POST /api/v1/auth/login - Verify credentials, issue a bearer token
//! - POST /api/v1/auth/logout - Revoke the current token

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bearer_token;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    id: String,
    username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let account = state
        .authenticator()
        .register(&request.username, &request.password)
        .await
        .map_err(AppError::Auth)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: account.id,
            username: account.username,
        }),
    ))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>> {
    let session = state
        .authenticator()
        .login(&request.username, &request.password)
        .await
        .map_err(AppError::Auth)?;

    Ok(Json(LoginResponse {
        token: session.token.to_string(),
        expires_at: session.expires_at,
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoking an unknown or absent token still returns 204; logout is
/// idempotent from the client's point of view.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.authenticator().logout(token).await;
    }
    StatusCode::NO_CONTENT
}
