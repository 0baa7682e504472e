// ============================
// crates/backend-lib/src/booking/service.rs
// ============================
//! Ticket lifecycle.
//!
//! Every entry point takes an [`Identity`] or [`OperatorCapability`], so a
//! caller cannot reach ticket data without first resolving a session token.
//!
//! Seat assignment reads the seats held on a train and inserts under one
//! lock, so a seat is held by at most one ticket per train within a process.
use metrics::counter;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;
use tripsync_common::{RouteDetails, SeatRequest, Ticket};

use crate::auth::{Identity, OperatorCapability};
use crate::booking::FareStrategy;
use crate::error::{BookingError, StoreError};
use crate::metrics::{TICKET_BOOKED, TICKET_CANCELLED, TICKET_CREATED, TICKET_UPDATED};
use crate::storage::{NewTicket, TicketStore};
use crate::validation::{validate_route, validate_seat};

/// Creates, books, updates and cancels tickets
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn TicketStore>,
    fares: Arc<dyn FareStrategy>,
    seat_lock: Arc<Mutex<()>>,
}

impl BookingService {
    pub fn new(store: Arc<dyn TicketStore>, fares: Arc<dyn FareStrategy>) -> Self {
        Self {
            store,
            fares,
            seat_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store an unbooked ticket for the caller: no seat, price 0
    #[instrument(skip(self, identity, route), fields(username = identity.username()))]
    pub async fn create(
        &self,
        identity: &Identity,
        route: RouteDetails,
    ) -> Result<Ticket, BookingError> {
        validate_route(&route).map_err(|e| BookingError::InvalidRequest(e.to_string()))?;

        let ticket = self
            .store
            .insert(NewTicket {
                username: identity.username().to_string(),
                route,
                seat: None,
                price: 0.0,
            })
            .await?;

        counter!(TICKET_CREATED).increment(1);
        tracing::info!(ticket_id = %ticket.id, "ticket created");
        Ok(ticket)
    }

    /// Book a seat for the caller at the fare for the route.
    ///
    /// A requested seat must not already be held on the same train; without
    /// one the lowest free numeric seat is assigned.
    #[instrument(skip(self, identity, request), fields(username = identity.username()))]
    pub async fn book(
        &self,
        identity: &Identity,
        request: SeatRequest,
    ) -> Result<Ticket, BookingError> {
        if identity.username().trim().is_empty() {
            return Err(BookingError::InvalidRequest(
                "Username is required".to_string(),
            ));
        }

        let route = request.route();
        validate_route(&route).map_err(|e| BookingError::InvalidRequest(e.to_string()))?;

        let price = self.fares.fare(&route);
        if !price.is_finite() || price < 0.0 {
            return Err(BookingError::InvalidRequest(format!(
                "No valid fare for train {}",
                route.train_name
            )));
        }

        if let Some(seat) = &request.seat {
            validate_seat(seat).map_err(|e| BookingError::InvalidRequest(e.to_string()))?;
        }

        let _seats = self.seat_lock.lock().await;
        let taken = self.seats_taken(&route.train_name).await?;
        let seat = match request.seat {
            Some(seat) => {
                if taken.contains(&seat) {
                    return Err(BookingError::InvalidRequest(format!(
                        "Seat {seat} is already booked on {}",
                        route.train_name
                    )));
                }
                seat
            },
            None => lowest_free_seat(&taken),
        };

        let ticket = self
            .store
            .insert(NewTicket {
                username: identity.username().to_string(),
                route,
                seat: Some(seat),
                price,
            })
            .await?;

        counter!(TICKET_BOOKED).increment(1);
        tracing::info!(ticket_id = %ticket.id, seat = ?ticket.seat, price, "ticket booked");
        Ok(ticket)
    }

    /// Change the route of one of the caller's tickets.
    ///
    /// Owner, seat and price are carried over from the stored ticket. A booked
    /// seat cannot move onto a train where that seat is already held.
    #[instrument(skip(self, identity, route), fields(username = identity.username()))]
    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        route: RouteDetails,
    ) -> Result<Ticket, BookingError> {
        validate_route(&route).map_err(|e| BookingError::InvalidRequest(e.to_string()))?;

        let _seats = self.seat_lock.lock().await;
        let current = self.owned_ticket(identity, id).await?;
        if let Some(seat) = &current.seat {
            if current.train_name != route.train_name
                && self.seats_taken(&route.train_name).await?.contains(seat)
            {
                return Err(BookingError::InvalidRequest(format!(
                    "Seat {seat} is already booked on {}",
                    route.train_name
                )));
            }
        }

        let updated = self
            .store
            .update(current.with_route(route))
            .await
            .map_err(|err| match err {
                StoreError::Missing(id) => BookingError::NotFound(id),
                other => BookingError::Store(other),
            })?;

        counter!(TICKET_UPDATED).increment(1);
        Ok(updated)
    }

    /// Cancel one of the caller's tickets
    #[instrument(skip(self, identity), fields(username = identity.username()))]
    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), BookingError> {
        self.owned_ticket(identity, id).await?;

        if !self.store.delete_by_id(id).await? {
            return Err(BookingError::NotFound(id.to_string()));
        }

        counter!(TICKET_CANCELLED).increment(1);
        tracing::info!(ticket_id = id, "ticket cancelled");
        Ok(())
    }

    /// The caller's tickets, oldest first
    pub async fn list_by_user(&self, identity: &Identity) -> Result<Vec<Ticket>, BookingError> {
        Ok(self.store.find_by_username(identity.username()).await?)
    }

    /// Every ticket in the system
    pub async fn list_all(
        &self,
        _operator: &OperatorCapability,
    ) -> Result<Vec<Ticket>, BookingError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, BookingError> {
        Ok(self.store.exists_by_id(id).await?)
    }

    async fn owned_ticket(&self, identity: &Identity, id: &str) -> Result<Ticket, BookingError> {
        let ticket = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        if ticket.username != identity.username() {
            tracing::warn!(ticket_id = id, owner = %ticket.username, "ticket access denied");
            return Err(BookingError::Forbidden);
        }

        Ok(ticket)
    }

    async fn seats_taken(&self, train_name: &str) -> Result<BTreeSet<String>, BookingError> {
        Ok(self
            .store
            .find_all()
            .await?
            .into_iter()
            .filter(|ticket| ticket.train_name == train_name)
            .filter_map(|ticket| ticket.seat)
            .collect())
    }
}

/// Smallest positive seat number not in `taken`
fn lowest_free_seat(taken: &BTreeSet<String>) -> String {
    let numbers: BTreeSet<u32> = taken.iter().filter_map(|s| s.parse().ok()).collect();
    let free = (1..).find(|n| !numbers.contains(n)).unwrap_or(1);
    free.to_string()
}
