// ============================
// crates/backend-lib/src/storage/memory.rs
// ============================
//! In-process store backed by `DashMap`.
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tripsync_common::{Ticket, TicketId};
use uuid::Uuid;

use super::{NewTicket, TicketStore, User, UserStore};
use crate::error::StoreError;

/// Volatile store for tests and single-process deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    /// Tickets with their insertion sequence number
    tickets: DashMap<TicketId, (u64, Ticket)>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted<F>(&self, keep: F) -> Vec<Ticket>
    where
        F: Fn(&Ticket) -> bool,
    {
        let mut tickets: Vec<(u64, Ticket)> = self
            .tickets
            .iter()
            .filter(|entry| keep(&entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by_key(|(seq, _)| *seq);
        tickets.into_iter().map(|(_, ticket)| ticket).collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(username).map(|user| user.clone()))
    }

    async fn insert_unique(&self, user: User) -> Result<(), StoreError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(user.username)),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            },
        }
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let ticket = ticket.into_ticket(Uuid::new_v4().to_string(), Utc::now());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.tickets.insert(ticket.id.clone(), (seq, ticket.clone()));
        Ok(ticket)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Ticket>, StoreError> {
        Ok(self.collect_sorted(|ticket| ticket.username == username))
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError> {
        Ok(self.collect_sorted(|_| true))
    }

    async fn update(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        match self.tickets.get_mut(&ticket.id) {
            Some(mut entry) => {
                entry.value_mut().1 = ticket.clone();
                Ok(ticket)
            },
            None => Err(StoreError::Missing(ticket.id)),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tickets.remove(id).is_some())
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tickets.contains_key(id))
    }
}
