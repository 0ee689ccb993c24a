/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions, and
 * the single-use tokens mailed out for password resets.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Session lifetime
pub const SESSION_TTL_DAYS: i64 = 30;

/// Password reset token lifetime, also the lifetime of the session it opens
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Profile ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Set on sessions opened by a password reset
    #[serde(default)]
    pub password_recovery: bool,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Create a JWT token for a profile
///
/// # Arguments
/// * `secret` - HS256 signing secret
/// * `profile_id` - Profile ID (UUID)
/// * `email` - Profile email
/// * `password_recovery` - Whether the session was opened from a reset link.
///   Such sessions may skip the old password, so they only last
///   `RESET_TOKEN_TTL_MINUTES`.
pub fn create_token(
    secret: &str,
    profile_id: Uuid,
    email: String,
    password_recovery: bool,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let lifetime = if password_recovery {
        Duration::minutes(RESET_TOKEN_TTL_MINUTES)
    } else {
        Duration::days(SESSION_TTL_DAYS)
    };
    let exp = now + lifetime;

    let claims = Claims {
        sub: profile_id.to_string(),
        email,
        password_recovery,
        exp: exp.timestamp().max(0) as u64,
        iat: now.timestamp().max(0) as u64,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Fresh reset token, as sent to the user
pub fn generate_reset_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Stored form of a reset token
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    hex::encode(hasher.finalize())
}
