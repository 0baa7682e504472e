// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `TripSync` booking server.

pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthRateLimiter, AuthService, DefaultAuth};
use crate::booking::BookingService;
use crate::config::{Settings, StorageBackend};
use crate::middleware::RateLimiter;
use crate::storage::{FlatFileStorage, MemoryStore, TicketStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Ticket lifecycle
    pub bookings: Arc<BookingService>,
    /// Loaded settings
    pub settings: Arc<Settings>,
    /// Request rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Failed-login lockouts, the same table `auth` consults
    pub login_throttle: AuthRateLimiter,
}

impl AppState {
    /// Create the application state over `store`
    pub fn new<S>(store: Arc<S>, settings: Settings) -> anyhow::Result<Self>
    where
        S: UserStore + TicketStore + 'static,
    {
        settings.validate()?;

        let auth = DefaultAuth::from_settings(store.clone(), &settings)?;
        let login_throttle = auth.login_throttle().clone();
        let bookings = Arc::new(BookingService::new(
            store,
            booking::fare::from_settings(&settings.booking),
        ));
        let rate_limiter = Arc::new(RateLimiter::new(
            Duration::from_secs(settings.rate_limit.window_secs),
            settings.rate_limit.max_requests,
        ));

        Ok(Self {
            auth: Arc::new(auth),
            bookings,
            settings: Arc::new(settings),
            rate_limiter,
            login_throttle,
        })
    }

    /// Evict expired request windows and served login lockouts
    pub fn cleanup(&self) {
        self.rate_limiter.cleanup();
        self.login_throttle.cleanup();
    }

    /// Create the application state over the store the settings select
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        match settings.storage.backend {
            StorageBackend::Memory => Self::new(Arc::new(MemoryStore::new()), settings),
            StorageBackend::File => {
                let store = FlatFileStorage::new(&settings.storage.path)?;
                Self::new(Arc::new(store), settings)
            },
        }
    }
}
