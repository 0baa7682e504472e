// ============================
// crates/backend-lib/src/handlers/extract.rs
// ============================
//! Bearer token extractors.
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::{Identity, OperatorCapability};
use crate::error::AppError;
use crate::AppState;

/// The caller, resolved from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

/// The caller, required to hold the operator capability
#[derive(Debug, Clone)]
pub struct Operator(pub OperatorCapability);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)
}

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let identity = state.auth.authenticate(token, Utc::now())?;
        Ok(Self(identity))
    }
}

impl FromRequestParts<Arc<AppState>> for Operator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let capability = state.auth.authorize_operator(token, Utc::now())?;
        Ok(Self(capability))
    }
}
