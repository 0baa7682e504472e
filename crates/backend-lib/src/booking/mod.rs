// ============================
// crates/backend-lib/src/booking/mod.rs
// ============================
//! Ticket booking.

pub mod fare;
mod service;

pub use fare::{FareStrategy, FixedFare, TrainFareTable};
pub use service::BookingService;
