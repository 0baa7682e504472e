// =========================
// tests/unit/token_tests.rs
// =========================
//! Unit tests for session tokens
use chrono::{Duration, TimeZone, Utc};
use tripsync_backend_lib::auth::TokenService;
use tripsync_backend_lib::error::TokenError;

use crate::test_utils::TEST_SECRET;

#[test]
fn test_foreign_secret_always_bad_signature() {
    let ours = TokenService::new(TEST_SECRET.as_bytes(), Duration::hours(10));
    let theirs = TokenService::new(b"some-other-secret-some-other-secret", Duration::hours(10));
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    let token = theirs.issue("alice", t0).unwrap();
    for offset in [Duration::zero(), Duration::hours(1), Duration::days(30)] {
        assert_eq!(
            ours.validate(&token, "alice", t0 + offset),
            Err(TokenError::BadSignature)
        );
    }
}

#[test]
fn test_rotated_secret_invalidates_tokens() {
    let before = TokenService::new(TEST_SECRET.as_bytes(), Duration::hours(10));
    let after = TokenService::new(b"rotated-secret-rotated-secret-rotated", Duration::hours(10));
    let now = Utc::now();

    let token = before.issue("alice", now).unwrap();
    assert!(before.validate(&token, "alice", now).is_ok());
    assert_eq!(after.validate(&token, "alice", now), Err(TokenError::BadSignature));
}

#[test]
fn test_window_boundaries() {
    let tokens = TokenService::new(TEST_SECRET.as_bytes(), Duration::minutes(5));
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let token = tokens.issue("alice", t0).unwrap();

    assert!(tokens.validate(&token, "alice", t0 + Duration::seconds(299)).is_ok());
    assert_eq!(
        tokens.validate(&token, "alice", t0 + Duration::seconds(300)),
        Err(TokenError::Expired)
    );
}
