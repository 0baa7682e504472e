// ============================
// crates/backend-lib/src/handlers/tickets.rs
// ============================
//! `/api/tickets` endpoints.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tripsync_common::{MessageResponse, NewTicketRequest, RouteDetails, SeatRequest, Ticket};

use crate::error::{AppError, BookingError, TokenError};
use crate::handlers::extract::{Authenticated, Operator};
use crate::AppState;

/// `GET /api/tickets/user/{username}`
pub async fn list_by_user(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    Path(username): Path<String>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    if identity.username() != username {
        tracing::warn!(
            caller = identity.username(),
            requested = %username,
            "ticket listing denied"
        );
        return Err(TokenError::SubjectMismatch.into());
    }

    Ok(Json(state.bookings.list_by_user(&identity).await?))
}

/// `POST /api/tickets`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    Json(req): Json<NewTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    if req
        .username
        .as_deref()
        .is_some_and(|owner| owner != identity.username())
    {
        return Err(BookingError::Forbidden.into());
    }

    let ticket = state.bookings.create(&identity, req.route()).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// `POST /api/tickets/book`
pub async fn book(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    Json(req): Json<SeatRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let ticket = state.bookings.book(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// `PUT /api/tickets/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    Json(route): Json<RouteDetails>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.bookings.update(&identity, &id, route).await?))
}

/// `DELETE /api/tickets/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.bookings.delete(&identity, &id).await?;
    Ok(Json(MessageResponse::new("Ticket deleted successfully")))
}

/// `GET /api/tickets`
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Operator(operator): Operator,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.bookings.list_all(&operator).await?))
}
