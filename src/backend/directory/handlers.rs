//! HTTP handlers for mailboxes and the directory

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use crate::backend::error::{require_pool, BackendError};
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::server::state::AppState;
use crate::shared::directory::search::normalize_query;
use crate::shared::directory::{
    CreateMailboxRequest, DirectoryEntry, GateRefusal, Mailbox, OwnedMailbox, SetPresenceRequest,
};

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    #[serde(default)]
    pub q: String,
}

/// Load a mailbox and check the caller owns it
async fn owned_mailbox(pool: &PgPool, mailbox_id: Uuid, owner_id: Uuid) -> Result<Mailbox, BackendError> {
    let mailbox = db::get_mailbox(pool, mailbox_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Mailbox not found"))?;
    if mailbox.owner_id != owner_id {
        tracing::warn!("Profile {} tried to modify mailbox {}", owner_id, mailbox_id);
        return Err(BackendError::forbidden("Not your mailbox"));
    }
    Ok(mailbox)
}

async fn save(pool: &PgPool, mailbox: &Mailbox) -> Result<Json<Mailbox>, BackendError> {
    let saved = db::save_mailbox_state(pool, mailbox)
        .await?
        .ok_or_else(|| BackendError::not_found("Mailbox not found"))?;
    Ok(Json(saved))
}

/// List the caller's mailboxes (GET /api/mailboxes)
pub async fn list_my_mailboxes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<OwnedMailbox>>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    Ok(Json(db::list_owned_mailboxes(pool, user.profile_id).await?))
}

/// Create a mailbox (POST /api/mailboxes)
///
/// The address is created on first use and shared afterwards.
pub async fn create_mailbox(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateMailboxRequest>,
) -> Result<(StatusCode, Json<OwnedMailbox>), BackendError> {
    request.validate()?;
    let pool = require_pool(&state.db_pool)?;

    let address = db::upsert_address(pool, &request.address).await?;
    let mailbox = db::create_mailbox(pool, user.profile_id, address.id, &request).await?;

    tracing::info!("Mailbox {} created by {}", mailbox.id, user.profile_id);
    Ok((StatusCode::CREATED, Json(OwnedMailbox { mailbox, address })))
}

/// Delete a mailbox (DELETE /api/mailboxes/{id})
pub async fn delete_mailbox(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(mailbox_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    owned_mailbox(pool, mailbox_id, user.profile_id).await?;
    if !db::delete_mailbox(pool, mailbox_id, user.profile_id).await? {
        return Err(BackendError::not_found("Mailbox not found"));
    }
    tracing::info!("Mailbox {} deleted", mailbox_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Flip directory visibility (POST /api/mailboxes/{id}/visibility)
pub async fn toggle_visibility(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(mailbox_id): Path<Uuid>,
) -> Result<Json<Mailbox>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let mut mailbox = owned_mailbox(pool, mailbox_id, user.profile_id).await?;
    mailbox.toggle_visibility();
    tracing::info!("Mailbox {} visible_in_directory={}", mailbox_id, mailbox.visible_in_directory);
    save(pool, &mailbox).await
}

/// Flip the red list (POST /api/mailboxes/{id}/red-list)
///
/// # Errors
///
/// * `409 Conflict` - The mailbox is not listed in the directory
pub async fn toggle_red_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(mailbox_id): Path<Uuid>,
) -> Result<Json<Mailbox>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let mut mailbox = owned_mailbox(pool, mailbox_id, user.profile_id).await?;
    mailbox.toggle_red_list()?;
    tracing::info!("Mailbox {} red_list={}", mailbox_id, mailbox.red_list);
    save(pool, &mailbox).await
}

/// Change presence (PUT /api/mailboxes/{id}/presence)
pub async fn set_presence(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(mailbox_id): Path<Uuid>,
    Json(request): Json<SetPresenceRequest>,
) -> Result<Json<Mailbox>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let mut mailbox = owned_mailbox(pool, mailbox_id, user.profile_id).await?;
    mailbox.set_presence(request.presence);
    tracing::info!("Mailbox {} presence={}", mailbox_id, request.presence.as_str());
    save(pool, &mailbox).await
}

/// Public view of a mailbox (GET /api/mailboxes/{id})
///
/// Unlisted mailboxes are only visible to their owner.
pub async fn get_public_mailbox(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(mailbox_id): Path<Uuid>,
) -> Result<Json<DirectoryEntry>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let owned = db::get_mailbox_with_address(pool, mailbox_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Mailbox not found"))?;

    let is_owner = user.is_some_and(|u| u.profile_id == owned.mailbox.owner_id);
    if !owned.mailbox.visible_in_directory && !is_owner {
        return Err(GateRefusal::NotListed.into());
    }
    Ok(Json(DirectoryEntry::render(&owned.mailbox, &owned.address)))
}

/// Search the directory (GET /api/directory?q=)
///
/// A blank query returns an empty list.
pub async fn search_directory(
    State(state): State<AppState>,
    Query(params): Query<DirectoryQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, BackendError> {
    let Some(query) = normalize_query(&params.q) else {
        return Ok(Json(Vec::new()));
    };
    let pool = require_pool(&state.db_pool)?;

    let hits = db::search_directory(pool, &query).await?;
    tracing::debug!("Directory search returned {} entries", hits.len());
    Ok(Json(
        hits.iter()
            .map(|owned| DirectoryEntry::render(&owned.mailbox, &owned.address))
            .collect(),
    ))
}
