/**
 * Authentication Extractors
 *
 * Handlers receive the caller's identity as an explicit argument. `AuthUser`
 * rejects requests without a valid bearer token; `MaybeAuthUser` lets anonymous
 * requests through but still rejects a token that is present and invalid.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::get_profile_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated profile data extracted from a JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub profile_id: Uuid,
    pub email: String,
    /// Session was opened from a password reset link
    pub password_recovery: bool,
}

/// Bearer token from the `Authorization` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify a token and, when a database is configured, that its profile still exists
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedUser, BackendError> {
    let claims = verify_token(&state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid or expired session")
    })?;

    let profile_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid profile ID in token: {:?}", e);
        BackendError::unauthorized("Invalid or expired session")
    })?;

    if let Some(pool) = &state.db_pool {
        verify_profile_exists(pool, profile_id).await?;
    }

    Ok(AuthenticatedUser {
        profile_id,
        email: claims.email,
        password_recovery: claims.password_recovery,
    })
}

async fn verify_profile_exists(pool: &PgPool, profile_id: Uuid) -> Result<(), BackendError> {
    match get_profile_by_id(pool, profile_id).await? {
        Some(_) => Ok(()),
        None => {
            tracing::warn!("Profile not found for session: {}", profile_id);
            Err(BackendError::unauthorized("Invalid or expired session"))
        }
    }
}

/// Axum extractor for an authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            BackendError::unauthorized("Authentication required")
        })?;
        Ok(AuthUser(authenticate(state, token).await?))
    }
}

/// Axum extractor for an optionally authenticated caller
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Some(token) => Ok(MaybeAuthUser(Some(authenticate(state, token).await?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
