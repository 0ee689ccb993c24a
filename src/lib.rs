// Increase recursion limit for complex async operations
#![recursion_limit = "256"]

//! Interphone - Main Library
//!
//! Interphone is a residential directory and digital intercom service. Residents
//! publish a mailbox tied to a physical address, control whether and how it shows
//! up in the directory, and receive rings and contact requests from visitors.
//! Requests are accepted or declined, and accepting one progressively shares
//! contact details between both parties.
//!
//! # Module Structure
//!
//! - **`shared`** - Domain types and pure logic
//!   - Profiles, addresses, mailboxes and directory rendering
//!   - The ring / contact-request state machine and disclosure rules
//!   - Email notification composition
//!   - Contacts, messages, realtime events, configuration, errors
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server over PostgreSQL
//!   - Authentication (bcrypt + JWT)
//!   - Notification dispatch, geocoding proxy, SSE realtime feed
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend modules and the `interphone-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use interphone::backend::server::init::create_app;
//! use interphone::shared::config::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for failures decided without I/O
//! - `backend::error::BackendError` for everything that reaches an HTTP response

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
