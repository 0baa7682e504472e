use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{Identity, OperatorCapability};
use crate::error::AuthError;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account; the username must not be taken
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError>;

    /// Check credentials and issue a session token valid from `now`
    async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError>;

    /// Check that `token` is a live session for `username`
    fn validate_token(&self, token: &str, username: &str, now: DateTime<Utc>)
        -> Result<(), AuthError>;

    /// Resolve a bearer token into the identity it was issued to
    fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError>;

    /// Resolve a bearer token and require the operator capability
    fn authorize_operator(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<OperatorCapability, AuthError>;

    /// Validity window of issued tokens
    fn token_ttl(&self) -> Duration;
}
