// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `TRIPSYNC_*` environment variables (`__` separates nested keys, e.g.
//! `TRIPSYNC_AUTH__TOKEN_SECRET`).
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Config file read by [`Settings::load`]
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRIPSYNC_";

/// Minimum accepted signing secret length in bytes
pub const MIN_SECRET_BYTES: usize = 32;

/// Longest accepted session token validity window (30 days)
pub const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub booking: BookingSettings,
    pub rate_limit: RateLimitSettings,
    pub log: LogSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which store backs users and tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps, lost on restart
    Memory,
    /// JSON documents under `storage.path`
    File,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

/// Credential and session token settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC key for session tokens. Rotating it invalidates every issued token.
    pub token_secret: String,
    /// Session token validity window
    pub token_ttl_secs: u64,
    /// scrypt cost parameter (log2 of N)
    pub hash_log_n: u8,
    /// Usernames granted the operator capability
    pub operators: Vec<String>,
    /// Failed logins before a username is locked out
    pub max_failed_logins: u32,
    /// Lockout duration
    pub lockout_secs: u64,
}

/// Fare settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    /// Fare used when a train has no entry in `train_fares`
    pub default_fare: f64,
    /// Per-train fares; empty means every booking costs `default_fare`
    pub train_fares: BTreeMap<String, f64>,
}

/// Request rate limiting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_secs: 10 * 60 * 60, // 10 hours
            hash_log_n: 15,
            operators: Vec::new(),
            max_failed_logins: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("token_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("hash_log_n", &self.hash_log_n)
            .field("operators", &self.operators)
            .field("max_failed_logins", &self.max_failed_logins)
            .field("lockout_secs", &self.lockout_secs)
            .finish()
    }
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            default_fare: 200.0,
            train_fares: BTreeMap::new(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 100,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from [`DEFAULT_CONFIG_PATH`] and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load settings from a specific TOML file and the environment.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("failed to load settings from {}", path.as_ref().display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the services cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_secret.len() < MIN_SECRET_BYTES {
            bail!(
                "auth.token_secret must be set to at least {MIN_SECRET_BYTES} bytes \
                 (env {ENV_PREFIX}AUTH__TOKEN_SECRET)"
            );
        }
        if self.auth.token_ttl_secs == 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            bail!("auth.token_ttl_secs must be between 1 and {MAX_TOKEN_TTL_SECS}");
        }
        if !(1..=20).contains(&self.auth.hash_log_n) {
            bail!("auth.hash_log_n must be between 1 and 20");
        }
        if self.auth.max_failed_logins == 0 {
            bail!("auth.max_failed_logins must be greater than zero");
        }
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_secs == 0 {
            bail!("rate_limit.max_requests and rate_limit.window_secs must be greater than zero");
        }
        if !self.booking.default_fare.is_finite() || self.booking.default_fare < 0.0 {
            bail!("booking.default_fare must be a non-negative number");
        }
        if let Some((train, _)) = self
            .booking
            .train_fares
            .iter()
            .find(|(_, fare)| !fare.is_finite() || **fare < 0.0)
        {
            bail!("booking.train_fares[{train}] must be a non-negative number");
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            bail!("log.level must be one of {}", LOG_LEVELS.join(", "));
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("invalid server address {addr}"))
    }

    /// Session token validity window
    pub fn token_ttl(&self) -> chrono::Duration {
        let secs = self.auth.token_ttl_secs.min(MAX_TOKEN_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or_default())
    }
}
