/**
 * Account Deletion Handler
 *
 * DELETE /api/account removes the profile through the `delete_user_account`
 * procedure; mailboxes, contact events, contacts and messages cascade.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::DeleteAccountRequest;
use crate::backend::auth::users::delete_account as delete_profile_account;
use crate::backend::error::{require_pool, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::error::SharedError;

/// Word the caller must type to confirm
pub const DELETE_CONFIRMATION: &str = "DELETE";

pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<StatusCode, BackendError> {
    if request.confirmation.trim() != DELETE_CONFIRMATION {
        return Err(SharedError::validation("confirmation", "Type DELETE to confirm").into());
    }
    let pool = require_pool(&state.db_pool)?;

    delete_profile_account(pool, user.profile_id).await?;
    tracing::info!("Account deleted: {}", user.profile_id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::middleware::AuthenticatedUser;
    use crate::shared::config::AppConfig;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let state = AppState::for_config(AppConfig::default());
        let caller = AuthUser(AuthenticatedUser {
            profile_id: Uuid::new_v4(),
            email: "marie@example.fr".to_string(),
            password_recovery: false,
        });
        let request = DeleteAccountRequest {
            confirmation: "delete".to_string(),
        };
        let err = delete_account(State(state), caller, Json(request)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
