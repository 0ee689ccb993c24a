//! Router helpers
//!
//! Requests are driven through `tower::ServiceExt::oneshot`, so no listener is
//! bound and no network is involved.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use interphone::backend::routes::create_router;
use interphone::backend::AppState;
use interphone::shared::AppConfig;

const BODY_LIMIT: usize = 1024 * 1024;

/// Router without a database
pub fn test_app() -> Router {
    create_router(AppState::for_config(AppConfig::default()))
}

/// Router over the given state
pub fn test_app_with(state: AppState) -> Router {
    create_router(state)
}

/// Build a request with an optional JSON body and bearer token
pub fn json_request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, super::auth_header(token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    }
}

/// Send a request and decode the JSON body (`Value::Null` when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Router failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
