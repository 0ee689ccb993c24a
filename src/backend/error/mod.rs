//! HTTP Errors
//!
//! `BackendError` and its JSON rendering `{ "error": ..., "status": ... }`.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Re-exports
//! ├── types.rs      - Error type definitions and status mapping
//! └── conversion.rs - IntoResponse and handler helpers
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use interphone::backend::error::BackendError;
//! use axum::response::Response;
//!
//! # async fn example() -> Result<Response, BackendError> {
//! // a 503 when started without a database
//! # Ok(Response::new("OK".into()))
//! # }
//! ```

pub mod types;

/// `IntoResponse` and `require_pool`
pub mod conversion;

pub use conversion::require_pool;
pub use types::BackendError;
