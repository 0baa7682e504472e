// ============================
// crates/backend-lib/src/booking/fare.rs
// ============================
//! Fare calculation.
use std::collections::BTreeMap;
use std::sync::Arc;
use tripsync_common::RouteDetails;

use crate::config::BookingSettings;

/// Decides what a booking on a route costs
pub trait FareStrategy: Send + Sync {
    fn fare(&self, route: &RouteDetails) -> f64;
}

/// The same fare for every route
#[derive(Debug, Clone, Copy)]
pub struct FixedFare(pub f64);

impl Default for FixedFare {
    fn default() -> Self {
        Self(200.0)
    }
}

impl FareStrategy for FixedFare {
    fn fare(&self, _route: &RouteDetails) -> f64 {
        self.0
    }
}

/// Per-train fares with a fallback
#[derive(Debug, Clone)]
pub struct TrainFareTable {
    fares: BTreeMap<String, f64>,
    default_fare: f64,
}

impl TrainFareTable {
    pub fn new(fares: BTreeMap<String, f64>, default_fare: f64) -> Self {
        Self {
            fares,
            default_fare,
        }
    }
}

impl FareStrategy for TrainFareTable {
    fn fare(&self, route: &RouteDetails) -> f64 {
        self.fares
            .get(route.train_name.trim())
            .copied()
            .unwrap_or(self.default_fare)
    }
}

/// Pick the strategy the booking settings describe
pub fn from_settings(settings: &BookingSettings) -> Arc<dyn FareStrategy> {
    if settings.train_fares.is_empty() {
        Arc::new(FixedFare(settings.default_fare))
    } else {
        Arc::new(TrainFareTable::new(
            settings.train_fares.clone(),
            settings.default_fare,
        ))
    }
}
