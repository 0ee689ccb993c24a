//! Route Configuration Module
//!
//! - **`router`** - Main router creation, service routes and layers
//! - **`api_routes`** - The `/api` endpoints
//!
//! # Example
//!
//! ```rust,no_run
//! use interphone::backend::routes::create_router;
//! use interphone::backend::server::state::AppState;
//! use interphone::shared::AppConfig;
//!
//! let router = create_router(AppState::for_config(AppConfig::default()));
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
