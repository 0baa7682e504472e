// ============================
// crates/backend-lib/src/error.rs
// ============================
//! Domain error taxonomy + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tripsync_common::{ErrorBody, ErrorDetail};

use crate::validation::ValidationError;

/// Failures reported by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Document missing: {0}")]
    Missing(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Unavailable(format!("corrupt document: {err}"))
    }
}

/// Session token failures, in the order they are checked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token subject does not match")]
    SubjectMismatch,

    #[error("Token could not be signed: {0}")]
    Signing(String),
}

/// Registration, login and token resolution failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Too many failed login attempts")]
    RateLimited,

    #[error("Operator capability required")]
    NotOperator,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Credential processing failed: {0}")]
    Internal(String),
}

/// Ticket lifecycle failures
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),

    #[error("Ticket belongs to another user")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("Missing or malformed authorization header")]
    MissingToken,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Auth(AuthError::Token(err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Booking(BookingError::Store(err))
    }
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(err) => match err {
                AuthError::DuplicateUsername => StatusCode::CONFLICT,
                AuthError::UserNotFound | AuthError::InvalidCredentials => {
                    StatusCode::UNAUTHORIZED
                },
                AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                AuthError::NotOperator | AuthError::Token(TokenError::SubjectMismatch) => {
                    StatusCode::FORBIDDEN
                },
                AuthError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Token(_) => StatusCode::UNAUTHORIZED,
                AuthError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Booking(err) => match err {
                BookingError::NotFound(_) => StatusCode::NOT_FOUND,
                BookingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                BookingError::Forbidden => StatusCode::FORBIDDEN,
                BookingError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(err) => match err {
                AuthError::DuplicateUsername => "AUTH_001",
                AuthError::UserNotFound => "AUTH_002",
                AuthError::InvalidCredentials => "AUTH_003",
                AuthError::InvalidInput(_) => "VAL_001",
                AuthError::RateLimited => "AUTH_004",
                AuthError::NotOperator => "AUTH_005",
                AuthError::Token(TokenError::BadSignature) => "TOKEN_001",
                AuthError::Token(TokenError::Expired) => "TOKEN_002",
                AuthError::Token(TokenError::SubjectMismatch) => "TOKEN_003",
                AuthError::Token(TokenError::Signing(_)) => "TOKEN_004",
                AuthError::Store(_) => "STORE_001",
                AuthError::Internal(_) => "AUTH_006",
            },
            AppError::Booking(err) => match err {
                BookingError::NotFound(_) => "TICKET_001",
                BookingError::InvalidRequest(_) => "TICKET_002",
                BookingError::Forbidden => "TICKET_003",
                BookingError::Store(_) => "STORE_001",
            },
            AppError::MissingToken => "TOKEN_000",
            AppError::RateLimitExceeded => "RATE_001",
        }
    }

    /// Get a sanitized message suitable for production use
    ///
    /// Unknown users and wrong passwords read the same so the response
    /// cannot be used to enumerate usernames.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Auth(err) => match err {
                AuthError::DuplicateUsername => "Username already exists".to_string(),
                AuthError::UserNotFound | AuthError::InvalidCredentials => {
                    "Invalid credentials".to_string()
                },
                AuthError::InvalidInput(_) => "Invalid input provided".to_string(),
                AuthError::RateLimited => {
                    "Too many authentication attempts, please try again later".to_string()
                },
                AuthError::NotOperator => "Operator access required".to_string(),
                AuthError::Token(TokenError::Expired) => "Session expired".to_string(),
                AuthError::Token(TokenError::SubjectMismatch) => {
                    "Token does not belong to this user".to_string()
                },
                AuthError::Token(_) => "Invalid session token".to_string(),
                AuthError::Store(_) => "Service temporarily unavailable".to_string(),
                AuthError::Internal(_) => "An internal server error occurred".to_string(),
            },
            AppError::Booking(err) => match err {
                BookingError::NotFound(_) => "Resource not found".to_string(),
                BookingError::InvalidRequest(_) => "Invalid booking request".to_string(),
                BookingError::Forbidden => "Access denied".to_string(),
                BookingError::Store(_) => "Service temporarily unavailable".to_string(),
            },
            AppError::MissingToken => "Authentication required".to_string(),
            AppError::RateLimitExceeded => {
                "Rate limit exceeded, please try again later".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
