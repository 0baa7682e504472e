// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use std::fs;
use tempfile::tempdir;
use tripsync_backend_lib::config::{Settings, StorageBackend};

use crate::test_utils::{test_settings, TEST_SECRET};

#[test]
fn test_settings_custom() {
    let settings = test_settings();

    assert!(settings.validate().is_ok());
    assert_eq!(settings.auth.token_secret, TEST_SECRET);
    assert_eq!(settings.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_settings_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tripsync.toml");
    fs::write(
        &path,
        format!(
            r#"
            [server]
            port = 9090

            [auth]
            token_secret = "{TEST_SECRET}"
            token_ttl_secs = 600

            [booking]
            default_fare = 120.0
            "#
        ),
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.server.port, 9090);
    assert_eq!(settings.token_ttl(), chrono::Duration::minutes(10));
    assert_eq!(settings.booking.default_fare, 120.0);
}

#[test]
fn test_shipped_config_needs_only_a_secret() {
    let shipped = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/default.toml");
    let text = fs::read_to_string(shipped).unwrap();
    assert!(!text.contains("token_secret ="));

    let dir = tempdir().unwrap();
    let path = dir.path().join("default.toml");
    fs::write(&path, &text).unwrap();
    // Without a secret the shipped file is rejected
    assert!(Settings::load_from(&path).is_err());

    let with_secret = text.replace("[auth]", &format!("[auth]\ntoken_secret = \"{TEST_SECRET}\""));
    fs::write(&path, with_secret).unwrap();
    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(
        settings.booking.train_fares.get("Vande Bharat Express"),
        Some(&2500.0)
    );
    assert_eq!(settings.token_ttl(), chrono::Duration::hours(10));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    assert!(Settings::load_from(&path).is_err());
}
