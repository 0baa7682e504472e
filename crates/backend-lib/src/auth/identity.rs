// ============================
// crates/backend-lib/src/auth/identity.rs
// ============================
//! Proofs of authentication handed to the booking layer.
//!
//! Both types can only be built inside this crate, after a token has been
//! verified, so holding one means the check already happened.

/// A user whose session token has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
}

impl Identity {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// An authenticated user listed as an operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorCapability {
    identity: Identity,
}

impl OperatorCapability {
    pub(crate) fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
