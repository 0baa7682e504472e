// =================================
// tests/integration/http_api_tests.rs
// =================================
//! End-to-end requests through the axum router
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::test_utils::{register_and_login, send, test_app, TEST_OPERATOR};

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_validate() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "pw1234").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/validate",
        None,
        Some(json!({ "token": token, "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token is valid");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/validate",
        None,
        Some(json!({ "token": token, "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TOKEN_003");
}

#[tokio::test]
async fn test_login_response_shape() {
    let app = test_app();
    register_and_login(&app, "alice", "pw1234").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "pw1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 36_000);
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app();
    register_and_login(&app, "alice", "pw1234").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "alice", "email": "a2@x.com", "password": "pw5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "AUTH_001");
}

#[tokio::test]
async fn test_bad_credentials_share_status() {
    let app = test_app();
    register_and_login(&app, "alice", "pw1234").await;

    let (wrong_status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong1" })),
    )
    .await;
    let (unknown_status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "wrong1" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tickets_require_bearer_token() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/api/tickets/user/alice", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_000");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/tickets/user/alice",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_001");
}

#[tokio::test]
async fn test_ticket_lifecycle_over_http() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "pw1234").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&token),
        Some(json!({
            "username": "alice",
            "trainName": "Express1",
            "source": "A",
            "destination": "B",
            "price": 9999
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], 0.0);

    let (status, booked) = send(
        &app,
        Method::POST,
        "/api/tickets/book",
        Some(&token),
        Some(json!({ "trainName": "Express1", "source": "A", "destination": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["price"], 200.0);
    assert_eq!(booked["seat"], "1");

    let id = booked["id"].as_str().unwrap();
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/tickets/{id}"),
        Some(&token),
        Some(json!({ "trainName": "Express2", "source": "A", "destination": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["destination"], "C");
    assert_eq!(updated["price"], 200.0);
    assert_eq!(updated["seat"], "1");

    let (status, listed) =
        send(&app, Method::GET, "/api/tickets/user/alice", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let path = format!("/api/tickets/{id}");
    let (status, _) = send(&app, Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_protected_fields() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "pw1234").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&token),
        Some(json!({ "trainName": "Express1", "source": "A", "destination": "B" })),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/tickets/{id}"),
        Some(&token),
        Some(json!({ "trainName": "Express1", "source": "A", "destination": "B", "price": 1.0 })),
    )
    .await;
    assert!(status.is_client_error());

    let (_, listed) = send(&app, Method::GET, "/api/tickets/user/alice", Some(&token), None).await;
    assert_eq!(listed[0]["price"], 0.0);
}

#[tokio::test]
async fn test_cross_user_access_denied() {
    let app = test_app();
    let alice = register_and_login(&app, "alice", "pw1234").await;
    let bob = register_and_login(&app, "bob", "pw1234").await;

    let (status, _) = send(&app, Method::GET, "/api/tickets/user/alice", Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&bob),
        Some(json!({
            "username": "alice",
            "trainName": "Express1",
            "source": "A",
            "destination": "B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&alice),
        Some(json!({ "trainName": "Express1", "source": "A", "destination": "B" })),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let path = format!("/api/tickets/{id}");
    let (status, body) = send(&app, Method::DELETE, &path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TICKET_003");
}

#[tokio::test]
async fn test_list_all_requires_operator() {
    let app = test_app();
    let alice = register_and_login(&app, "alice", "pw1234").await;
    let ops = register_and_login(&app, TEST_OPERATOR, "pw1234").await;

    let (status, _) = send(&app, Method::GET, "/api/tickets", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, all) = send(&app, Method::GET, "/api/tickets", Some(&ops), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(all.is_array());
}

#[tokio::test]
async fn test_invalid_route_rejected() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "pw1234").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tickets/book",
        Some(&token),
        Some(json!({ "trainName": "Express1", "source": "A", "destination": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "TICKET_002");
}
