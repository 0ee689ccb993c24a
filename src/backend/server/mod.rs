//! Server Module
//!
//! Server initialization and shared state.
//!
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`config`** - Database pool loading and migrations
//! - **`init`** - `create_app`, which wires state into the router
//!
//! # Example
//!
//! ```rust,no_run
//! use interphone::backend::server::create_app;
//! use interphone::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(AppConfig::from_env()?).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Database loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
