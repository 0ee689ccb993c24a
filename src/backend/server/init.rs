/**
 * Server Initialization
 *
 * Builds `AppState` from the configuration and hands it to the router.
 *
 * # Initialization Process
 *
 * 1. Load the optional database pool (runs migrations)
 * 2. Create the broadcast channel, dispatcher and geocoder
 * 3. Create the router with all routes and layers
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::config::AppConfig;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient: a missing or unreachable database
/// leaves `db_pool` empty and data routes answer 503.
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("Initializing Interphone backend server");

    if config.uses_development_secret() {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    let db_pool = load_database(&config).await;
    let app_state = AppState::for_config(config).with_pool(db_pool);

    tracing::info!(
        database = app_state.db_pool.is_some(),
        dispatcher = app_state.dispatcher.name(),
        "Application state initialized"
    );

    create_router(app_state)
}
