// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "auth.registered";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOGIN_LOCKOUT: &str = "auth.login.lockout";
pub const TICKET_CREATED: &str = "ticket.created";
pub const TICKET_BOOKED: &str = "ticket.booked";
pub const TICKET_UPDATED: &str = "ticket.updated";
pub const TICKET_CANCELLED: &str = "ticket.cancelled";
pub const REQUEST_RATE_LIMITED: &str = "http.rate_limited";
