use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{
    AuthRateLimiter, AuthService, Identity, OperatorCapability, PasswordHasher, TokenService,
};
use crate::config::Settings;
use crate::error::{AuthError, StoreError};
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, USER_REGISTERED};
use crate::storage::{User, UserStore};
use crate::validation::{validate_email, validate_password, validate_username};

/// Verified against when the username is unknown, so a miss costs one hash too
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
    throttle: AuthRateLimiter,
    operators: BTreeSet<String>,
    decoy_hash: String,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: TokenService,
        throttle: AuthRateLimiter,
        operators: impl IntoIterator<Item = String>,
    ) -> Result<Self, AuthError> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            tokens,
            throttle,
            operators: operators.into_iter().collect(),
            decoy_hash,
        })
    }

    /// Build from loaded settings
    pub fn from_settings(users: Arc<dyn UserStore>, settings: &Settings) -> anyhow::Result<Self> {
        let auth = &settings.auth;
        let hasher = PasswordHasher::new(auth.hash_log_n)?;
        let tokens = TokenService::new(auth.token_secret.as_bytes(), settings.token_ttl());
        let throttle = AuthRateLimiter::new(
            auth.max_failed_logins,
            std::time::Duration::from_secs(auth.lockout_secs),
        );

        Ok(Self::new(users, hasher, tokens, throttle, auth.operators.clone())?)
    }

    /// The per-username login throttle, shared with its cleanup task
    pub fn login_throttle(&self) -> &AuthRateLimiter {
        &self.throttle
    }

    /// Hash off the async worker threads
    async fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let hasher = self.hasher;
        let plain = zeroize::Zeroizing::new(plain.to_string());
        tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
    }

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        let plain = zeroize::Zeroizing::new(plain.to_string());
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn login_failed(&self, username: &str, reason: AuthError) -> AuthError {
        self.throttle.record_failed_attempt(username);
        counter!(LOGIN_FAILURE).increment(1);
        tracing::warn!(username, reason = %reason, "login failed");
        reason
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[instrument(skip(self, email, password))]
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;

        // Fast path only; the store's unique insert is what guarantees it
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateUsername);
        }

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.hash(password).await?,
            created_at: Utc::now(),
        };

        match self.users.insert_unique(user).await {
            Ok(()) => {},
            Err(StoreError::DuplicateKey(_)) => return Err(AuthError::DuplicateUsername),
            Err(err) => return Err(err.into()),
        }

        counter!(USER_REGISTERED).increment(1);
        tracing::info!("user registered");
        Ok(())
    }

    #[instrument(skip(self, password, now))]
    async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        if !self.throttle.check_rate_limit(username) {
            tracing::warn!(username, "login rejected while locked out");
            return Err(AuthError::RateLimited);
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            self.verify(password, &self.decoy_hash).await?;
            return Err(self.login_failed(username, AuthError::UserNotFound));
        };

        if !self.verify(password, &user.password_hash).await? {
            return Err(self.login_failed(username, AuthError::InvalidCredentials));
        }

        self.throttle.record_success(username);
        let token = self.tokens.issue(&user.username, now)?;

        counter!(LOGIN_SUCCESS).increment(1);
        tracing::info!("login succeeded");
        Ok(token)
    }

    fn validate_token(
        &self,
        token: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        Ok(self.tokens.validate(token, username, now)?)
    }

    fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let claims = self.tokens.verify(token, now)?;
        Ok(Identity::new(claims.sub))
    }

    fn authorize_operator(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<OperatorCapability, AuthError> {
        let identity = self.authenticate(token, now)?;
        if !self.operators.contains(identity.username()) {
            tracing::warn!(username = identity.username(), "operator access denied");
            return Err(AuthError::NotOperator);
        }
        Ok(OperatorCapability::new(identity))
    }

    fn token_ttl(&self) -> Duration {
        self.tokens.ttl()
    }
}
