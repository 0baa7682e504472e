// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers. Business rules live in the auth and booking services;
//! handlers only translate between JSON and service calls.

pub mod auth;
pub mod extract;
pub mod tickets;

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
