//! HTTP API tests without a database
//!
//! Input validation runs before any storage access, so malformed requests answer
//! `400` while well-formed ones reach the missing database and answer `503`.

#![cfg(feature = "ssr")]

mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use common::{generate_test_token, json_request, send, test_app};

#[tokio::test]
async fn test_health_reports_missing_database() {
    let app = test_app();
    let body = assert_status!(send(&app, json_request(Method::GET, "/health", None, None)).await, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "database": false }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = test_app();
    let body = assert_status!(
        send(&app, json_request(Method::GET, "/api/nowhere", None, None)).await,
        StatusCode::NOT_FOUND
    );
    assert_error_body!(body, 404);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = test_app();
    let body = assert_status!(
        send(&app, json_request(Method::GET, "/api/auth/me", None, None)).await,
        StatusCode::UNAUTHORIZED
    );
    assert_error_body!(body, 401);
}

#[tokio::test]
async fn test_me_rejects_forged_token() {
    let app = test_app();
    let forged = interphone::backend::auth::sessions::create_token("another-secret", Uuid::new_v4(), "x@y.fr".to_string(), false)
        .unwrap();
    assert_status!(
        send(&app, json_request(Method::GET, "/api/auth/me", None, Some(&forged))).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_signup_validation_precedes_storage() {
    let app = test_app();
    let mismatch = json!({
        "email": "claire@example.fr",
        "password": "secret1",
        "confirm_password": "secret2",
        "first_name": "Claire",
        "last_name": "Martin"
    });
    let body = assert_status!(
        send(&app, json_request(Method::POST, "/api/auth/signup", Some(mismatch), None)).await,
        StatusCode::BAD_REQUEST
    );
    assert_error_body!(body, 400);

    let valid = json!({
        "email": "claire@example.fr",
        "password": "secret1",
        "confirm_password": "secret1",
        "first_name": "Claire",
        "last_name": "Martin"
    });
    assert_status!(
        send(&app, json_request(Method::POST, "/api/auth/signup", Some(valid), None)).await,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_login_without_password_is_bad_request() {
    let app = test_app();
    assert_status!(
        send(
            &app,
            json_request(Method::POST, "/api/auth/login", Some(json!({ "email": "a@b.fr", "password": "" })), None)
        )
        .await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_anonymous_ring_needs_sender_name() {
    let app = test_app();
    let uri = format!("/api/mailboxes/{}/rings", Uuid::new_v4());

    assert_status!(
        send(&app, json_request(Method::POST, &uri, Some(json!({ "message": "Colis" })), None)).await,
        StatusCode::BAD_REQUEST
    );
    assert_status!(
        send(
            &app,
            json_request(Method::POST, &uri, Some(json!({ "message": "Colis", "sender_name": "Livreur" })), None)
        )
        .await,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_authenticated_request_needs_no_name() {
    let app = test_app();
    let token = generate_test_token(Uuid::new_v4(), "voisin@example.fr");
    let uri = format!("/api/mailboxes/{}/requests", Uuid::new_v4());
    assert_status!(
        send(&app, json_request(Method::POST, &uri, Some(json!({ "message": "Bonjour" })), Some(&token))).await,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_respond_rejects_unknown_decision() {
    let app = test_app();
    let token = generate_test_token(Uuid::new_v4(), "owner@example.fr");
    let uri = format!("/api/requests/{}/respond", Uuid::new_v4());
    let (status, _) = send(&app, json_request(Method::POST, &uri, Some(json!({ "decision": "maybe" })), Some(&token))).await;
    assert!(status.is_client_error(), "unexpected status {}", status);
}

#[tokio::test]
async fn test_delete_account_needs_confirmation() {
    let app = test_app();
    let token = generate_test_token(Uuid::new_v4(), "owner@example.fr");
    assert_status!(
        send(
            &app,
            json_request(Method::DELETE, "/api/account", Some(json!({ "confirmation": "delete" })), Some(&token))
        )
        .await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_blank_directory_query_is_empty() {
    let app = test_app();
    let body = assert_status!(
        send(&app, json_request(Method::GET, "/api/directory?q=%20%20", None, None)).await,
        StatusCode::OK
    );
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_short_address_query_skips_geocoder() {
    let app = test_app();
    let body = assert_status!(
        send(&app, json_request(Method::GET, "/api/addresses/search?q=ru", None, None)).await,
        StatusCode::OK
    );
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_email_function_stub() {
    let app = test_app();
    let payload = json!({
        "to": "owner@example.fr",
        "subject": "Quelqu'un a sonné",
        "html": "<p>Colis</p>",
        "type": "ring"
    });
    let body = assert_status!(
        send(&app, json_request(Method::POST, "/functions/v1/send-notification-email", Some(payload), None)).await,
        StatusCode::OK
    );
    assert_eq!(body["success"], json!(true));

    assert_status!(
        send(
            &app,
            json_request(Method::POST, "/functions/v1/send-notification-email", Some(json!({ "to": "x@y.fr" })), None)
        )
        .await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_realtime_requires_token() {
    let app = test_app();
    assert_status!(
        send(&app, json_request(Method::GET, "/api/realtime", None, None)).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_realtime_accepts_query_token() {
    use tower::ServiceExt;

    let app = test_app();
    let token = generate_test_token(Uuid::new_v4(), "owner@example.fr");
    let request = Request::builder()
        .uri(format!("/api/realtime?token={}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}
