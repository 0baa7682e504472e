// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Lockout after repeated failed logins.

use dashmap::DashMap;
use metrics::counter;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metrics::LOGIN_LOCKOUT;

/// Default number of failed attempts before lockout
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Entry in the attempt map
#[derive(Debug, Clone)]
struct AttemptEntry {
    /// Number of failed attempts
    failed_attempts: u32,
    /// Time of the last failed attempt
    last_failure: Instant,
    /// When the lockout expires, if locked out
    lockout_expiry: Option<Instant>,
}

/// Per-username login throttle
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    /// Failed attempts keyed by username
    attempts: Arc<DashMap<String, AttemptEntry>>,
    /// Maximum number of failed attempts before lockout
    max_attempts: u32,
    /// Duration of lockout period
    lockout_duration: Duration,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl AuthRateLimiter {
    /// Create a new login throttle
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    /// Record a failed login for `username`
    pub fn record_failed_attempt(&self, username: &str) {
        let now = Instant::now();

        let mut entry = self
            .attempts
            .entry(username.to_string())
            .or_insert_with(|| AttemptEntry {
                failed_attempts: 0,
                last_failure: now,
                lockout_expiry: None,
            });

        // A served lockout or a quiet window starts a fresh count
        let served = entry.lockout_expiry.is_some_and(|expiry| now >= expiry);
        if served || self.is_stale(&entry, now) {
            entry.failed_attempts = 0;
            entry.lockout_expiry = None;
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts && entry.lockout_expiry.is_none() {
            entry.lockout_expiry = Some(now + self.lockout_duration);
            counter!(LOGIN_LOCKOUT).increment(1);
            tracing::warn!(
                username,
                attempts = entry.failed_attempts,
                "username locked out after repeated failed logins"
            );
        }
    }

    /// Record a successful login
    pub fn record_success(&self, username: &str) {
        self.attempts.remove(username);
    }

    /// Whether `username` may attempt to log in
    pub fn check_rate_limit(&self, username: &str) -> bool {
        self.attempts
            .get(username)
            .and_then(|entry| entry.lockout_expiry)
            .is_none_or(|expiry| Instant::now() >= expiry)
    }

    /// Drop served lockouts and failures older than one lockout window
    pub fn cleanup(&self) {
        let now = Instant::now();

        self.attempts.retain(|_, entry| match entry.lockout_expiry {
            Some(expiry) => now < expiry,
            None => !self.is_stale(entry, now),
        });
    }

    fn is_stale(&self, entry: &AttemptEntry, now: Instant) -> bool {
        entry.lockout_expiry.is_none()
            && now.duration_since(entry.last_failure) >= self.lockout_duration
    }

    /// Number of usernames currently tracked
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}
