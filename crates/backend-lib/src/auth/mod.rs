// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod identity;
pub mod password;
pub mod rate_limit;
pub mod token;
mod service;
mod service_impl;

pub use identity::{Identity, OperatorCapability};
pub use password::PasswordHasher;
pub use rate_limit::AuthRateLimiter;
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{Claims, TokenService};
