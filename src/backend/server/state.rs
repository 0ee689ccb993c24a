/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the optional database pool
 * - the real-time broadcast channel
 * - the notification dispatcher and the geocoder
 * - the loaded configuration
 *
 * Everything is cheap to clone (`Arc`, channel senders, pooled clients).
 *
 * # Example
 *
 * ```rust,no_run
 * use interphone::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) -> String {
 *     state.config.public_base_url.clone()
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::geocode::Geocoder;
use crate::backend::notify::{HttpFunctionDispatcher, LogDispatcher, NotificationDispatcher};
use crate::backend::realtime::broadcast::{realtime_channel, RealtimeEventBroadcast};
use crate::shared::config::AppConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` when no database is configured. Handlers go through
    /// `require_pool`, which answers 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Real-time event broadcast channel
    pub realtime_broadcast: RealtimeEventBroadcast,

    /// Email delivery
    pub dispatcher: Arc<dyn NotificationDispatcher>,

    /// Address API client
    pub geocoder: Geocoder,

    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State without a database
    pub fn for_config(config: AppConfig) -> Self {
        Self {
            db_pool: None,
            realtime_broadcast: realtime_channel(),
            dispatcher: dispatcher_for(&config),
            geocoder: Geocoder::new(config.geocode_base_url.clone()),
            config: Arc::new(config),
        }
    }

    pub fn with_pool(mut self, pool: Option<PgPool>) -> Self {
        self.db_pool = pool;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }
}

/// HTTP dispatcher when an email function URL is configured, log-only otherwise
fn dispatcher_for(config: &AppConfig) -> Arc<dyn NotificationDispatcher> {
    let Some(url) = &config.notification_function_url else {
        tracing::info!("No email function configured, notifications will only be logged");
        return Arc::new(LogDispatcher);
    };

    match HttpFunctionDispatcher::new(url.clone(), config.notification_function_key.clone()) {
        Ok(dispatcher) => {
            tracing::info!("Email notifications go to {}", url);
            Arc::new(dispatcher)
        }
        Err(e) => {
            tracing::warn!("Failed to build email function client, logging instead: {}", e);
            Arc::new(LogDispatcher)
        }
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for RealtimeEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime_broadcast.clone()
    }
}

impl FromRef<AppState> for Arc<dyn NotificationDispatcher> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispatcher.clone()
    }
}

impl FromRef<AppState> for Geocoder {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.geocoder.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
