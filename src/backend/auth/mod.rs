//! Authentication Module
//!
//! Accounts, sessions and the identity endpoints.
//!
//! - **`users`** - Profile rows and database operations
//! - **`sessions`** - JWT tokens and password reset tokens
//! - **`handlers`** - HTTP handlers for the identity endpoints
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens (HS256, secret from configuration) expire after 30 days
//! - Reset tokens are single use, stored hashed, and expire after one hour
//! - Invalid credentials return 401 without telling which part was wrong

/// Profile data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, SignupRequest};
pub use handlers::{
    change_password, delete_account, forgot_password, get_me, login, logout, reset_password, signup,
    update_profile,
};
