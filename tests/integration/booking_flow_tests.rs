// =====================================
// tests/integration/booking_flow_tests.rs
// =====================================
//! Ticket lifecycle driven by identities resolved from real tokens
use chrono::Utc;
use tripsync_backend_lib::error::BookingError;
use tripsync_common::{RouteDetails, SeatRequest};

use crate::test_utils::{setup_test_env, TEST_OPERATOR};

fn route(train: &str, source: &str, destination: &str) -> RouteDetails {
    RouteDetails {
        train_name: train.to_string(),
        source: source.to_string(),
        destination: destination.to_string(),
    }
}

#[tokio::test]
async fn test_full_booking_scenario() {
    let (state, _dir) = setup_test_env();
    state.auth.register("alice", "a@x.com", "pw1").await.unwrap();

    let now = Utc::now();
    let token = state.auth.login("alice", "pw1", now).await.unwrap();
    let alice = state.auth.authenticate(&token, now).unwrap();

    let t1 = state
        .bookings
        .create(&alice, route("Express1", "A", "B"))
        .await
        .unwrap();
    assert_eq!(t1.seat, None);
    assert_eq!(t1.price, 0.0);

    let booked = state
        .bookings
        .book(
            &alice,
            SeatRequest {
                train_name: "Express1".to_string(),
                source: "A".to_string(),
                destination: "B".to_string(),
                seat: None,
            },
        )
        .await
        .unwrap();
    assert!(booked.seat.is_some());
    assert_eq!(booked.price, 200.0);

    state.bookings.delete(&alice, &t1.id).await.unwrap();
    assert!(!state.bookings.exists(&t1.id).await.unwrap());

    let listed = state.bookings.list_by_user(&alice).await.unwrap();
    assert!(listed.iter().all(|t| t.id != t1.id));
    assert_eq!(listed, vec![booked]);
}

#[tokio::test]
async fn test_update_preserves_owner_seat_and_price() {
    let (state, _dir) = setup_test_env();
    state.auth.register("alice", "a@x.com", "pw1234").await.unwrap();
    let now = Utc::now();
    let token = state.auth.login("alice", "pw1234", now).await.unwrap();
    let alice = state.auth.authenticate(&token, now).unwrap();

    let booked = state
        .bookings
        .book(
            &alice,
            SeatRequest {
                train_name: "Express1".to_string(),
                source: "A".to_string(),
                destination: "B".to_string(),
                seat: Some("12".to_string()),
            },
        )
        .await
        .unwrap();

    let updated = state
        .bookings
        .update(&alice, &booked.id, route("Express9", "X", "Y"))
        .await
        .unwrap();

    assert_eq!(updated.username, "alice");
    assert_eq!(updated.seat.as_deref(), Some("12"));
    assert_eq!(updated.price, booked.price);
    assert_eq!(updated.route(), route("Express9", "X", "Y"));
}

#[tokio::test]
async fn test_other_users_cannot_touch_tickets() {
    let (state, _dir) = setup_test_env();
    for name in ["alice", "bob"] {
        state
            .auth
            .register(name, &format!("{name}@x.com"), "pw1234")
            .await
            .unwrap();
    }
    let now = Utc::now();
    let alice_token = state.auth.login("alice", "pw1234", now).await.unwrap();
    let bob_token = state.auth.login("bob", "pw1234", now).await.unwrap();
    let alice = state.auth.authenticate(&alice_token, now).unwrap();
    let bob = state.auth.authenticate(&bob_token, now).unwrap();

    let ticket = state
        .bookings
        .create(&alice, route("Express1", "A", "B"))
        .await
        .unwrap();

    assert!(matches!(
        state.bookings.delete(&bob, &ticket.id).await,
        Err(BookingError::Forbidden)
    ));
    assert!(matches!(
        state
            .bookings
            .update(&bob, &ticket.id, route("Express1", "A", "C"))
            .await,
        Err(BookingError::Forbidden)
    ));
    assert!(state.bookings.list_by_user(&bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_operator_sees_everything() {
    let (state, _dir) = setup_test_env();
    for name in ["alice", "bob", TEST_OPERATOR] {
        state
            .auth
            .register(name, &format!("{name}@x.com"), "pw1234")
            .await
            .unwrap();
    }
    let now = Utc::now();
    for name in ["alice", "bob"] {
        let token = state.auth.login(name, "pw1234", now).await.unwrap();
        let identity = state.auth.authenticate(&token, now).unwrap();
        state
            .bookings
            .create(&identity, route("Express1", "A", "B"))
            .await
            .unwrap();
    }

    let ops_token = state.auth.login(TEST_OPERATOR, "pw1234", now).await.unwrap();
    let operator = state.auth.authorize_operator(&ops_token, now).unwrap();
    assert_eq!(state.bookings.list_all(&operator).await.unwrap().len(), 2);

    let alice_token = state.auth.login("alice", "pw1234", now).await.unwrap();
    assert!(state.auth.authorize_operator(&alice_token, now).is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_seat_requests_single_winner() {
    let (state, _dir) = setup_test_env();
    let now = Utc::now();
    let mut identities = Vec::new();
    for n in 0..6 {
        let username = format!("rider{n}");
        state.auth.register(&username, "r@x.com", "pw1").await.unwrap();
        let token = state.auth.login(&username, "pw1", now).await.unwrap();
        identities.push(state.auth.authenticate(&token, now).unwrap());
    }

    let handles: Vec<_> = identities
        .into_iter()
        .map(|rider| {
            let bookings = state.bookings.clone();
            tokio::spawn(async move {
                let request = SeatRequest {
                    train_name: "Express1".to_string(),
                    source: "A".to_string(),
                    destination: "B".to_string(),
                    seat: Some("7".to_string()),
                };
                bookings.book(&rider, request).await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(ticket) => {
                assert_eq!(ticket.seat.as_deref(), Some("7"));
                winners += 1;
            },
            Err(err) => assert!(matches!(err, BookingError::InvalidRequest(_))),
        }
    }
    assert_eq!(winners, 1);
}
