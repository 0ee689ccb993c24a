/**
 * Current Profile Handlers
 *
 * - GET /api/auth/me - the caller's profile
 * - PUT /api/profile - edit names, phone and the email notification switch
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::users::{get_profile, update_profile as store_profile_update};
use crate::backend::error::{require_pool, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::directory::{Profile, ProfileUpdate};

/// Get current profile handler
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid token
/// * `404 Not Found` - Profile deleted since the token was issued
/// * `503 Service Unavailable` - Database not configured
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Profile>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let profile = get_profile(pool, user.profile_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Profile not found"))?;
    Ok(Json(profile))
}

/// Update current profile handler
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, BackendError> {
    let update = update.normalized()?;
    let pool = require_pool(&state.db_pool)?;

    let row = store_profile_update(pool, user.profile_id, &update)
        .await?
        .ok_or_else(|| BackendError::not_found("Profile not found"))?;

    tracing::info!("Profile updated: {}", user.profile_id);
    Ok(Json(row.into_profile()))
}
