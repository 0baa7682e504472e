// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for password hashing
use tripsync_backend_lib::auth::PasswordHasher;

#[test]
fn test_password_hashing_and_verification() {
    let hasher = PasswordHasher::new(4).unwrap();
    let password = "SecureP@ssw0rd";
    let hash = hasher.hash(password).unwrap();

    // Hash should be different than the original password
    assert_ne!(password, hash);
    assert!(!hash.contains(password));

    assert!(hasher.verify(password, &hash));
    assert!(!hasher.verify("WrongP@ssw0rd", &hash));
}

#[test]
fn test_unicode_passwords() {
    let hasher = PasswordHasher::new(4).unwrap();
    let hash = hasher.hash("pässwörd-пароль").unwrap();

    assert!(hasher.verify("pässwörd-пароль", &hash));
    assert!(!hasher.verify("passwort-пароль", &hash));
}

#[test]
fn test_invalid_cost_rejected() {
    assert!(PasswordHasher::new(200).is_err());
}
