// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for account and ticket requests.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tripsync_common::RouteDetails;

// Common validation constants
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 32;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_ROUTE_FIELD_LENGTH: usize = 100;
const MAX_SEAT_LENGTH: usize = 16;

// Regex patterns for validation
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("static regex"));
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex")
    });
static ROUTE_FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^<>/\\{}()\[\];]*$").expect("static regex"));
static SEAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("static regex"));

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid seat: {0}")]
    InvalidSeat(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    if username.trim().is_empty() {
        return Err(ValidationError::InvalidUsername(
            "Username is required".to_string(),
        ));
    }

    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::InvalidUsername(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }

    Ok(username)
}

/// Validate a password; any non-empty secret is accepted
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password is required".to_string(),
        ));
    }

    Ok(password)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address cannot be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

fn validate_route_field<'a>(label: &str, value: &'a str) -> ValidationResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidRoute(format!("{label} is required")));
    }

    if value.len() > MAX_ROUTE_FIELD_LENGTH {
        return Err(ValidationError::InvalidRoute(format!(
            "{label} cannot exceed {MAX_ROUTE_FIELD_LENGTH} characters"
        )));
    }

    if !ROUTE_FIELD_REGEX.is_match(value) {
        return Err(ValidationError::InvalidRoute(format!(
            "{label} contains invalid characters"
        )));
    }

    Ok(value)
}

/// Validate the route part of a ticket
pub fn validate_route(route: &RouteDetails) -> ValidationResult<()> {
    validate_route_field("Train name", &route.train_name)?;
    validate_route_field("Departure station", &route.source)?;
    validate_route_field("Arrival station", &route.destination)?;

    if route.source.trim().eq_ignore_ascii_case(route.destination.trim()) {
        return Err(ValidationError::InvalidRoute(
            "Departure and arrival stations must be different".to_string(),
        ));
    }

    Ok(())
}

/// Validate a requested seat label
pub fn validate_seat(seat: &str) -> ValidationResult<&str> {
    if seat.is_empty() || seat.len() > MAX_SEAT_LENGTH || !SEAT_REGEX.is_match(seat) {
        return Err(ValidationError::InvalidSeat(format!(
            "Seat must be 1 to {MAX_SEAT_LENGTH} letters, digits or '-'"
        )));
    }

    Ok(seat)
}
