/**
 * Password Handlers
 *
 * - POST /api/auth/password/forgot - always 202, emails a single-use link when the
 *   account exists
 * - POST /api/auth/password/reset - consumes the link token and opens a recovery
 *   session
 * - PUT /api/auth/password - change the password of the current session
 *
 * Reset tokens are stored as SHA-256 digests and expire after one hour.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::backend::auth::handlers::issue_session;
use crate::backend::auth::handlers::types::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
};
use crate::backend::auth::sessions::{generate_reset_token, hash_reset_token};
use crate::backend::auth::users::{
    consume_reset_token, get_profile_by_email, get_profile_by_id, store_reset_token, update_password_hash,
};
use crate::backend::error::{require_pool, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::notify::dispatch_best_effort;
use crate::backend::server::state::AppState;
use crate::shared::directory::profile::validate_new_password;
use crate::shared::error::{require_text, SharedError};
use crate::shared::intercom::notification::compose_password_reset;

fn hash_password(password: &str) -> Result<String, BackendError> {
    hash(password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Server error")
    })
}

/// Link sent by email
pub fn reset_link(public_base_url: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", public_base_url.trim_end_matches('/'), token)
}

/// Request a reset link
///
/// Answers 202 whether or not the email is known.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<StatusCode, BackendError> {
    let email = require_text("email", &request.email)?;
    let pool = require_pool(&state.db_pool)?;

    let Some(row) = get_profile_by_email(pool, email).await? else {
        tracing::info!("Password reset requested for unknown email");
        return Ok(StatusCode::ACCEPTED);
    };

    let token = generate_reset_token();
    store_reset_token(pool, row.id, &hash_reset_token(&token)).await?;

    let email = compose_password_reset(&row.email, &reset_link(&state.config.public_base_url, &token));
    dispatch_best_effort(state.dispatcher.as_ref(), &email).await;

    tracing::info!("Password reset link issued for {}", row.id);
    Ok(StatusCode::ACCEPTED)
}

/// Set a new password from a reset link
///
/// # Errors
///
/// * `400 Bad Request` - Password rules, or unknown/expired/used token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    require_text("token", &request.token)?;
    validate_new_password(&request.new_password, &request.confirm_password)?;
    let pool = require_pool(&state.db_pool)?;

    let profile_id = consume_reset_token(pool, &hash_reset_token(&request.token))
        .await?
        .ok_or_else(|| {
            tracing::warn!("Rejected reset token");
            BackendError::from(SharedError::validation("token", "Invalid or expired reset link"))
        })?;

    update_password_hash(pool, profile_id, &hash_password(&request.new_password)?).await?;

    let row = get_profile_by_id(pool, profile_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Profile not found"))?;

    tracing::info!("Password reset for {}", profile_id);
    Ok(Json(issue_session(&state.config.jwt_secret, row.into_profile(), true)?))
}

/// Change the password of the current session
///
/// # Errors
///
/// * `400 Bad Request` - Password rules, or missing old password
/// * `401 Unauthorized` - Wrong old password
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, BackendError> {
    validate_new_password(&request.new_password, &request.confirm_password)?;
    if !user.password_recovery && request.old_password.as_deref().map_or(true, |p| p.is_empty()) {
        return Err(SharedError::validation("old_password", "Current password is required").into());
    }
    let pool = require_pool(&state.db_pool)?;

    let row = get_profile_by_id(pool, user.profile_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Profile not found"))?;

    if !user.password_recovery {
        let old_password = request.old_password.as_deref().unwrap_or_default();
        let valid = verify(old_password, &row.password_hash).map_err(|e| {
            tracing::error!("Password verification error: {:?}", e);
            BackendError::internal("Server error")
        })?;
        if !valid {
            tracing::warn!("Wrong current password for {}", user.profile_id);
            return Err(BackendError::unauthorized("Current password is incorrect"));
        }
    }

    update_password_hash(pool, user.profile_id, &hash_password(&request.new_password)?).await?;
    tracing::info!("Password changed for {}", user.profile_id);
    Ok(StatusCode::NO_CONTENT)
}
