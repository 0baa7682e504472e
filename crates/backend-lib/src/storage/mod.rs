// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction for users and tickets.
//!
//! Records are value snapshots: a mutation replaces the stored document.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tripsync_common::{RouteDetails, Ticket};

use crate::error::StoreError;

pub mod flat_file;
pub mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStore;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable
    pub username: String,
    pub email: String,
    /// scrypt PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A ticket before the store has assigned it an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub username: String,
    pub route: RouteDetails,
    pub seat: Option<String>,
    pub price: f64,
}

impl NewTicket {
    /// Build the stored ticket under `id`
    pub fn into_ticket(self, id: String, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            username: self.username,
            train_name: self.route.train_name,
            source: self.route.source,
            destination: self.route.destination,
            seat: self.seat,
            price: self.price,
            created_at,
        }
    }
}

/// Account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert an account, failing with [`StoreError::DuplicateKey`] if the
    /// username is taken. The check and the insert are a single atomic step.
    async fn insert_unique(&self, user: User) -> Result<(), StoreError>;
}

/// Ticket persistence
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Store a new ticket under a fresh id
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError>;

    /// Tickets owned by `username`, oldest first
    async fn find_by_username(&self, username: &str) -> Result<Vec<Ticket>, StoreError>;

    /// Every ticket, oldest first
    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Replace a stored ticket, failing with [`StoreError::Missing`] if it is gone
    async fn update(&self, ticket: Ticket) -> Result<Ticket, StoreError>;

    /// Remove a ticket; `false` if there was nothing to remove
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;
}
