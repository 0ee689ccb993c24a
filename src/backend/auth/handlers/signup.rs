/**
 * Signup Handler
 *
 * This module implements the registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate names, email format and password rules
 * 2. Check if the email is already registered
 * 3. Hash password using bcrypt
 * 4. Create the profile
 * 5. Return a session token and the profile
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::handlers::issue_session;
use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::users::{create_profile, get_profile_by_email, NewProfile};
use crate::backend::error::{require_pool, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::directory::profile::validate_signup;

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing names, invalid email, mismatched or short password
/// * `409 Conflict` - Email already registered
/// * `503 Service Unavailable` - Database not configured
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    validate_signup(
        &request.email,
        &request.password,
        &request.confirm_password,
        &request.first_name,
        &request.last_name,
    )?;

    let pool = require_pool(&state.db_pool)?;
    tracing::info!("Signup request for email: {}", request.email);

    if get_profile_by_email(pool, &request.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", request.email);
        return Err(BackendError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Server error")
    })?;

    let row = create_profile(
        pool,
        NewProfile {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
        },
    )
    .await?;

    tracing::info!("Profile created successfully: {}", row.id);

    let response = issue_session(&state.config.jwt_secret, row.into_profile(), false)?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::AppConfig;

    fn request(password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            email: "marie@example.fr".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            first_name: "Marie".to_string(),
            last_name: "Curie".to_string(),
            phone: None,
        }
    }

    fn state() -> AppState {
        AppState::for_config(AppConfig::default())
    }

    #[tokio::test]
    async fn test_signup_mismatched_passwords() {
        let err = signup(State(state()), Json(request("secret1", "secret2"))).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_short_password() {
        let err = signup(State(state()), Json(request("abc", "abc"))).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_no_database() {
        let err = signup(State(state()), Json(request("secret1", "secret1"))).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
