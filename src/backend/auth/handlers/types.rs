/**
 * Authentication Handler Types
 *
 * Request and response bodies shared by the authentication handlers.
 */

use serde::{Deserialize, Serialize};

use crate::shared::directory::Profile;

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    /// Plain password (hashed before storage)
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth response
///
/// Returned by signup, login and password reset. Contains the JWT token
/// and the caller's profile.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// JWT token for authentication (30-day expiration)
    pub token: String,
    pub profile: Profile,
    /// Session opened from a reset link
    #[serde(default)]
    pub password_recovery: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ResetPasswordRequest {
    /// Token from the reset link
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Change password request
///
/// `old_password` may be omitted only by a session opened from a reset link.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

/// Account deletion must be confirmed by typing `DELETE`
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub confirmation: String,
}
