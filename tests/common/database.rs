//! Database test fixtures and utilities
//!
//! Database-backed tests are skipped unless `DATABASE_URL` points at a
//! PostgreSQL instance the tests may write to.

use sqlx::PgPool;

/// Run database migrations for testing
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Remove all rows while preserving the schema
pub async fn cleanup_test_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "TRUNCATE TABLE messages, contacts, contact_events, password_resets, mailboxes, addresses, profiles CASCADE",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Test database fixture
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Connect and migrate, or `None` when no database is configured
    pub async fn try_new() -> Option<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())?;
        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create test database pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        Some(Self { pool })
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clean up test data
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        cleanup_test_data(&self.pool).await
    }
}

/// Skip the current test when no database is configured
#[macro_export]
macro_rules! require_database {
    () => {
        match $crate::common::TestDatabase::try_new().await {
            Some(db) => db,
            None => {
                eprintln!("DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}
