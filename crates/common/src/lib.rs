// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the `TripSync` booking backend and its clients.
//! Field names use camelCase on the wire, matching the browser client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Identifier assigned to a ticket by the store
pub type TicketId = String;

/// A booking record as returned by the backend.
///
/// Tickets are value snapshots: every mutation produces a new `Ticket`
/// that replaces the stored one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Store-assigned identifier
    pub id: TicketId,
    /// Owning username
    pub username: String,
    /// Name of the train
    pub train_name: String,
    /// Departure station
    pub source: String,
    /// Arrival station
    pub destination: String,
    /// Seat label, set at booking time
    #[serde(default)]
    pub seat: Option<String>,
    /// Fare assigned at booking time (0 until booked)
    pub price: f64,
    /// When the ticket was first stored
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// The route fields of this ticket
    pub fn route(&self) -> RouteDetails {
        RouteDetails {
            train_name: self.train_name.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
        }
    }

    /// A copy of this ticket with only the route fields replaced
    #[must_use]
    pub fn with_route(&self, route: RouteDetails) -> Self {
        Self {
            train_name: route.train_name,
            source: route.source,
            destination: route.destination,
            ..self.clone()
        }
    }
}

/// The mutable part of a ticket.
///
/// Unknown fields are rejected, so an update body that tries to carry
/// `username`, `seat` or `price` fails to deserialize.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RouteDetails {
    pub train_name: String,
    pub source: String,
    pub destination: String,
}

/// Body of `POST /api/tickets`
///
/// The browser client sends the whole form, including a display price;
/// only the route is taken from it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTicketRequest {
    /// Must match the authenticated user when present
    #[serde(default)]
    pub username: Option<String>,
    pub train_name: String,
    pub source: String,
    pub destination: String,
}

impl NewTicketRequest {
    pub fn route(&self) -> RouteDetails {
        RouteDetails {
            train_name: self.train_name.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
        }
    }
}

/// Body of `POST /api/tickets/book`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    pub train_name: String,
    pub source: String,
    pub destination: String,
    /// Preferred seat; the lowest free seat is assigned when absent
    #[serde(default)]
    pub seat: Option<String>,
}

impl SeatRequest {
    pub fn route(&self) -> RouteDetails {
        RouteDetails {
            train_name: self.train_name.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
        }
    }
}

/// Body of `POST /api/auth/register`
#[derive(Deserialize, Serialize, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Drop for RegisterRequest {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Body of `POST /api/auth/login`
#[derive(Deserialize, Serialize, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Drop for LoginRequest {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Successful login response
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Compact signed session token
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Body of `POST /api/auth/validate`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ValidateTokenRequest {
    pub token: String,
    pub username: String,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error envelope returned for every failed request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Stable error code plus a human-readable message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
