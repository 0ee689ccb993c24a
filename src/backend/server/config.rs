/**
 * Server Configuration
 *
 * Opens the optional PostgreSQL connection described by `AppConfig`.
 *
 * # Error Handling
 *
 * Connection errors are logged but do not prevent server startup. Without a
 * pool every data route answers 503 while the email function, the address
 * search and the health check keep working.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::shared::config::AppConfig;

/// Pool handed to `AppState`, `None` when the server runs without storage
pub type DatabaseConfig = Option<PgPool>;

const MAX_CONNECTIONS: u32 = 10;

/// Connect to `database_url` and apply the bundled migrations
///
/// Yields `None` when no URL is configured or the connection fails.
pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
