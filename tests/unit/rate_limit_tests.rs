// ==============================
// tests/unit/rate_limit_tests.rs
// ==============================
//! This test suite is designed to validate the functionality of the `AuthRateLimiter`
use std::time::Duration;
use tripsync_backend_lib::auth::AuthRateLimiter;

#[test]
fn test_rate_limiter_allows_initial_attempts() {
    let rate_limiter = AuthRateLimiter::default();

    // First attempt should be allowed
    assert!(rate_limiter.check_rate_limit("alice"));
}

#[test]
fn test_rate_limiter_blocks_after_max_attempts() {
    let rate_limiter = AuthRateLimiter::default();

    // Record failed attempts (default max is 5)
    for _ in 0..5 {
        rate_limiter.record_failed_attempt("alice");
    }

    // After 5 failures, should be blocked
    assert!(!rate_limiter.check_rate_limit("alice"));
}

#[test]
fn test_rate_limiter_resets_after_success() {
    let rate_limiter = AuthRateLimiter::default();

    // Record 3 failed attempts
    for _ in 0..3 {
        rate_limiter.record_failed_attempt("alice");
    }
    rate_limiter.record_success("alice");

    // Counter starts over
    for _ in 0..4 {
        rate_limiter.record_failed_attempt("alice");
    }
    assert!(rate_limiter.check_rate_limit("alice"));
}

#[test]
fn test_rate_limiter_cleanup_keeps_active_lockouts() {
    let rate_limiter = AuthRateLimiter::new(1, Duration::from_secs(60));

    rate_limiter.record_failed_attempt("alice");
    rate_limiter.cleanup();

    assert_eq!(rate_limiter.tracked(), 1);
    assert!(!rate_limiter.check_rate_limit("alice"));
}
