//! Messaging HTTP Handlers
//!
//! Address-book contacts and direct messages between contacts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::get_profile;
use crate::backend::error::{require_pool, BackendError};
use crate::backend::intercom::db::latest_accepted_request;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::intercom::address_book_entries;
use crate::shared::messaging::{
    AddContactRequest, Contact, DirectMessage, ListContactsResponse, ListMessagesResponse, SendMessageRequest,
    UpdateContactRequest,
};
use crate::shared::RealtimeEvent;

#[derive(Debug, Default, Deserialize)]
pub struct ContactsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// List the caller's contacts (GET /api/contacts?q=)
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ContactsQuery>,
) -> Result<Json<ListContactsResponse>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let query = params.q.unwrap_or_default();

    let contacts = db::get_contacts(pool, user.profile_id)
        .await?
        .into_iter()
        .filter(|c| c.matches(&query))
        .collect();

    Ok(Json(ListContactsResponse { contacts }))
}

/// Add a contact by hand (POST /api/contacts)
///
/// Only allowed towards someone linked to the caller by an accepted request.
/// The entry carries what that request disclosed.
pub async fn add_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<AddContactRequest>,
) -> Result<(StatusCode, Json<Contact>), BackendError> {
    if request.contact_user_id == user.profile_id {
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, "Cannot add yourself as a contact"));
    }
    let pool = require_pool(&state.db_pool)?;

    let event = latest_accepted_request(pool, user.profile_id, request.contact_user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "Profile {} tried to add {} without an accepted request",
                user.profile_id,
                request.contact_user_id
            );
            BackendError::forbidden("No accepted contact request with this person")
        })?;

    let sender_id = event
        .sender
        .profile_id()
        .ok_or_else(|| BackendError::not_found("Contact not found"))?;
    let sender = get_profile(pool, sender_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Contact not found"))?;
    let recipient = get_profile(pool, event.recipient_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Contact not found"))?;

    let entry = address_book_entries(&event, &recipient, &sender)
        .into_iter()
        .find(|c| c.owner_id == user.profile_id)
        .ok_or_else(|| BackendError::not_found("Contact not found"))?;

    let contact = db::upsert_contact(pool, &entry).await?;
    tracing::info!("Contact {} added by {}", contact.contact_user_id, user.profile_id);
    Ok((StatusCode::CREATED, Json(contact)))
}

/// Edit contact notes (PATCH /api/contacts/{id})
pub async fn update_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(contact_id): Path<Uuid>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<Contact>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let notes = request.normalized_notes();
    let contact = db::update_contact_notes(pool, contact_id, user.profile_id, notes.as_deref())
        .await?
        .ok_or_else(|| BackendError::not_found("Contact not found"))?;
    Ok(Json(contact))
}

/// DELETE /api/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(contact_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    if !db::delete_contact(pool, contact_id, user.profile_id).await? {
        return Err(BackendError::not_found("Contact not found"));
    }
    tracing::info!("Contact {} deleted by {}", contact_id, user.profile_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Thread with a contact, oldest first (GET /api/messages/{contact_user_id})
///
/// Opening the thread marks the counterpart's messages as read.
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(contact_user_id): Path<Uuid>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let pool = require_pool(&state.db_pool)?;

    let marked = db::mark_thread_read(pool, user.profile_id, contact_user_id).await?;
    if marked > 0 {
        tracing::debug!("Marked {} messages from {} as read", marked, contact_user_id);
    }

    let messages = db::get_thread(pool, user.profile_id, contact_user_id).await?;
    Ok(Json(ListMessagesResponse { messages }))
}

/// Send a message to a contact (POST /api/messages/{contact_user_id})
///
/// # Errors
///
/// * `400 Bad Request` - Empty or oversized body
/// * `403 Forbidden` - The recipient is not in the caller's contacts
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(contact_user_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<DirectMessage>), BackendError> {
    let body = request.validated_body()?;
    let pool = require_pool(&state.db_pool)?;

    if !db::has_contact(pool, user.profile_id, contact_user_id).await? {
        tracing::warn!("Profile {} messaged non-contact {}", user.profile_id, contact_user_id);
        return Err(BackendError::forbidden("You can only message your contacts"));
    }

    let message = db::insert_message(pool, user.profile_id, contact_user_id, request.contact_event_id, &body).await?;
    tracing::info!("Message {} sent to {}", message.id, contact_user_id);

    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::message(contact_user_id, message.id, user.profile_id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(message)))
}
