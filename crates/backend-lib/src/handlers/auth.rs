// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! `/api/auth` endpoints.
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use tripsync_common::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, ValidateTokenRequest,
};

use crate::error::AppError;
use crate::AppState;

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = state
        .auth
        .login(&req.username, &req.password, Utc::now())
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.token_ttl().num_seconds(),
    }))
}

/// `POST /api/auth/validate`
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateTokenRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .validate_token(&req.token, &req.username, Utc::now())?;

    Ok(Json(MessageResponse::new("Token is valid")))
}
