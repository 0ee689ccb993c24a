//! Middleware Module
//!
//! Request-level concerns shared by every handler.
//!
//! - **`auth`** - `AuthUser` / `MaybeAuthUser` extractors resolving the bearer token
//!
//! # Example
//!
//! ```rust,no_run
//! use interphone::backend::middleware::AuthUser;
//!
//! async fn handler(AuthUser(user): AuthUser) -> String {
//!     user.profile_id.to_string()
//! }
//! ```

pub mod auth;

pub use auth::{authenticate, bearer_token, AuthUser, AuthenticatedUser, MaybeAuthUser};
