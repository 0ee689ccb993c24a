/**
 * Login and Logout Handlers
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Unknown email and wrong password return the same 401
 * - Sessions are stateless JWTs, so logout only records the event
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::issue_session;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::users::get_profile_by_email;
use crate::backend::error::{require_pool, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler (POST /api/auth/login)
///
/// # Errors
///
/// * `400 Bad Request` - Empty email or password
/// * `401 Unauthorized` - Unknown email or wrong password
/// * `503 Service Unavailable` - Database not configured
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    require_text("email", &request.email)?;
    require_text("password", &request.password)?;

    let pool = require_pool(&state.db_pool)?;
    tracing::info!("Login request for: {}", request.email);

    let row = get_profile_by_email(pool, &request.email).await?.ok_or_else(|| {
        tracing::warn!("Profile not found: {}", request.email);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    let valid = verify(&request.password, &row.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::internal("Server error")
    })?;

    if !valid {
        tracing::warn!("Invalid password for: {}", request.email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    tracing::info!("Profile logged in successfully: {}", row.id);
    Ok(Json(issue_session(&state.config.jwt_secret, row.into_profile(), false)?))
}

/// Logout handler (POST /api/auth/logout)
pub async fn logout(AuthUser(user): AuthUser) -> StatusCode {
    tracing::info!("Profile logged out: {}", user.profile_id);
    StatusCode::NO_CONTENT
}
