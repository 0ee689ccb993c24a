//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and session issuing
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - Registration
//! ├── login.rs    - Login and logout
//! ├── me.rs       - Current profile read and update
//! ├── password.rs - Forgot, reset and change password
//! └── account.rs  - Account deletion
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`get_me`** - GET /api/auth/me
//! - **`update_profile`** - PUT /api/profile
//! - **`forgot_password`** - POST /api/auth/password/forgot
//! - **`reset_password`** - POST /api/auth/password/reset
//! - **`change_password`** - PUT /api/auth/password
//! - **`delete_account`** - DELETE /api/account

/// Request and response types
pub mod types;

pub mod signup;
pub mod login;
pub mod me;
pub mod password;
pub mod account;

use crate::backend::auth::sessions::create_token;
use crate::backend::error::BackendError;
use crate::shared::directory::Profile;

pub use types::{AuthResponse, LoginRequest, SignupRequest};

pub use account::delete_account;
pub use login::{login, logout};
pub use me::{get_me, update_profile};
pub use password::{change_password, forgot_password, reset_password};
pub use signup::signup;

/// Sign a session token for `profile`
pub(crate) fn issue_session(
    secret: &str,
    profile: Profile,
    password_recovery: bool,
) -> Result<AuthResponse, BackendError> {
    let token = create_token(secret, profile.id, profile.email.clone(), password_recovery).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("Server error")
    })?;
    Ok(AuthResponse {
        token,
        profile,
        password_recovery,
    })
}
