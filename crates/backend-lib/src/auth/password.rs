// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are scrypt PHC strings (`$scrypt$ln=..,r=..,p=..$salt$hash`), so the
//! cost parameters travel with the hash and old hashes keep verifying after
//! the configured cost changes.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};

use crate::error::AuthError;
use crate::validation::ValidationError;

/// scrypt block size
const BLOCK_SIZE: u32 = 8;

/// scrypt parallelism
const PARALLELISM: u32 = 1;

/// Salted, slow one-way hashing of user passwords
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with cost `N = 2^log_n`
    pub fn new(log_n: u8) -> anyhow::Result<Self> {
        let params = Params::new(log_n, BLOCK_SIZE, PARALLELISM, Params::RECOMMENDED_LEN)
            .map_err(|e| anyhow::anyhow!("invalid scrypt cost {log_n}: {e}"))?;
        Ok(Self { params })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, AuthError> {
        if plain.is_empty() {
            return Err(ValidationError::InvalidPassword("Password is required".to_string()).into());
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a stored hash.
    ///
    /// A hash that does not parse never verifies.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}
