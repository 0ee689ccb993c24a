/**
 * Router Configuration
 *
 * Combines the route groups into a single Axum router and adds the
 * cross-cutting layers.
 *
 * # Route Order
 *
 * 1. Service routes (health, realtime feed, email function)
 * 2. API routes (identity, directory, intercom, messaging)
 * 3. Fallback handler (JSON 404)
 */

use axum::{http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::notify::send_notification_email;
use crate::backend::realtime::handle_realtime_subscription;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// ## Service Routes
///
/// - `GET /health` - Liveness and database availability
/// - `GET /api/realtime` - Server-Sent Events feed of the caller's events
/// - `POST /functions/v1/send-notification-email` - Email function (logs only)
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/realtime", get(handle_realtime_subscription))
        .route(
            "/functions/v1/send-notification-email",
            axum::routing::post(send_notification_email),
        );

    let router = configure_api_routes(router);

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "database": state.db_pool.is_some(),
    }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "status": 404 })),
    )
}
