// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, health, tickets};
use crate::middleware::rate_limit;
use crate::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/validate", post(auth::validate))
        .route("/api/tickets", get(tickets::list_all).post(tickets::create))
        .route("/api/tickets/book", post(tickets::book))
        .route("/api/tickets/user/{username}", get(tickets::list_by_user))
        .route("/api/tickets/{id}", put(tickets::update).delete(tickets::delete))
        .layer(from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
