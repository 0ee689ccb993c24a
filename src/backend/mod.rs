//! Backend Module
//!
//! The Axum HTTP server: identity, directory, intercom, messaging, the realtime
//! feed and the email function.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - Router assembly
//! - **`auth`** - Accounts, JWT sessions, password reset
//! - **`middleware`** - `AuthUser` / `MaybeAuthUser` extractors
//! - **`directory`** - Mailboxes, addresses, directory search
//! - **`intercom`** - Rings, contact requests, inbox lists
//! - **`messaging`** - Contacts and direct messages
//! - **`realtime`** - Server-Sent Events feed
//! - **`notify`** - Email dispatch and the email function
//! - **`geocode`** - Address autocomplete proxy
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── server/      - State, database, app creation
//! ├── routes/      - Router
//! ├── auth/        - Identity
//! ├── middleware/  - Extractors
//! ├── directory/   - Mailboxes and search
//! ├── intercom/    - Rings and requests
//! ├── messaging/   - Contacts and messages
//! ├── realtime/    - SSE
//! ├── notify/      - Email dispatch
//! ├── geocode/     - Address search
//! └── error/       - Error types
//! ```
//!
//! # Flow of a ring
//!
//! 1. `intercom::handlers::ring_mailbox` validates the body (400 before any I/O)
//! 2. Loads the mailbox, its owner, and the caller's profile
//! 3. `shared::intercom::plan_submission` applies the mailbox gate and disclosure
//! 4. The event is stored, a `ring` trigger is broadcast to the owner, and the
//!    email is dispatched best effort
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`; the error renders as
//! `{"error": ..., "status": ...}` with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and profile management
pub mod auth;

/// Request extractors
pub mod middleware;

/// Mailboxes and the directory
pub mod directory;

/// Rings and contact requests
pub mod intercom;

/// Contacts and direct messages
pub mod messaging;

/// Email notifications
pub mod notify;

/// Address search
pub mod geocode;

pub use error::BackendError;
pub use realtime::{broadcast_event, handle_realtime_subscription, RealtimeEventBroadcast};
pub use server::{create_app, AppState};
