//! HTTP handlers for rings and contact requests
//!
//! Handlers load rows, hand them to the planners in `shared::intercom`, then
//! persist, publish the realtime trigger and dispatch the email. Email failures
//! never undo what was stored. A response and the address-book entries it seeds
//! commit together.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::db::{self, EventWithMailbox};
use crate::backend::auth::users::{get_profile, get_profiles_by_ids};
use crate::backend::directory::db::get_mailbox;
use crate::backend::error::{require_pool, BackendError};
use crate::backend::messaging::db::upsert_contact;
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::notify::dispatch_best_effort;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::directory::{MailboxAction, Profile};
use crate::shared::intercom::{
    plan_response, plan_submission, ContactEvent, DashboardCounts, Decision, EventView, SubmissionInput,
};
use crate::shared::RealtimeEvent;

/// Body of POST /api/requests/{id}/respond
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    pub decision: Decision,
}

async fn require_profile(pool: &PgPool, id: Uuid) -> Result<Profile, BackendError> {
    get_profile(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Profile not found"))
}

async fn submit(
    state: AppState,
    action: MailboxAction,
    caller: Option<Uuid>,
    mailbox_id: Uuid,
    input: SubmissionInput,
) -> Result<(StatusCode, Json<ContactEvent>), BackendError> {
    input.validate(caller.is_some())?;
    let pool = require_pool(&state.db_pool)?;

    let mailbox = get_mailbox(pool, mailbox_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Mailbox not found"))?;
    let recipient = require_profile(pool, mailbox.owner_id).await?;
    let sender = match caller {
        Some(id) => Some(require_profile(pool, id).await?),
        None => None,
    };

    let plan = plan_submission(action, &input, sender.as_ref(), &mailbox, &recipient, Utc::now()).map_err(|e| {
        tracing::warn!("Refused {:?} on mailbox {}: {}", action, mailbox_id, e);
        e
    })?;

    db::insert_event(pool, &plan.event).await?;
    tracing::info!(
        "{} {} stored for mailbox {} (sender authenticated: {})",
        plan.event.kind.as_str(),
        plan.event.id,
        mailbox_id,
        plan.event.sender.is_authenticated()
    );

    let trigger = match action {
        MailboxAction::Ring => RealtimeEvent::ring(recipient.id, plan.event.id, mailbox.id),
        MailboxAction::Request => RealtimeEvent::contact_request(recipient.id, plan.event.id, mailbox.id),
    };
    broadcast_event(&state.realtime_broadcast, trigger).await;

    match &plan.notification {
        Some(email) => dispatch_best_effort(state.dispatcher.as_ref(), email).await,
        None => tracing::debug!("Recipient {} gets no email for {}", recipient.id, plan.event.id),
    }

    Ok((StatusCode::CREATED, Json(plan.event)))
}

/// Ring a mailbox (POST /api/mailboxes/{id}/rings)
///
/// Anonymous visitors must give a `sender_name`.
///
/// # Errors
///
/// * `400 Bad Request` - Empty message or missing sender name
/// * `404 Not Found` - Unknown or unlisted mailbox
/// * `409 Conflict` - Do not disturb, or red-listed mailbox
pub async fn ring_mailbox(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(mailbox_id): Path<Uuid>,
    Json(input): Json<SubmissionInput>,
) -> Result<(StatusCode, Json<ContactEvent>), BackendError> {
    submit(state, MailboxAction::Ring, user.map(|u| u.profile_id), mailbox_id, input).await
}

/// Send a contact request to a mailbox (POST /api/mailboxes/{id}/requests)
pub async fn request_contact(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(mailbox_id): Path<Uuid>,
    Json(input): Json<SubmissionInput>,
) -> Result<(StatusCode, Json<ContactEvent>), BackendError> {
    submit(state, MailboxAction::Request, user.map(|u| u.profile_id), mailbox_id, input).await
}

/// Accept or decline a contact request (POST /api/requests/{id}/respond)
///
/// Only the first response is stored; any later one gets 409.
pub async fn respond_to_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RespondRequest>,
) -> Result<Json<ContactEvent>, BackendError> {
    let pool = require_pool(&state.db_pool)?;

    let (event, mailbox_name) = db::get_event(pool, event_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Contact request not found"))?;
    let recipient = require_profile(pool, user.profile_id).await?;
    let sender = match event.sender.profile_id() {
        Some(id) => get_profile(pool, id).await?,
        None => None,
    };

    let plan = plan_response(&event, request.decision, &recipient, sender.as_ref(), &mailbox_name, Utc::now())
        .map_err(|e| {
            tracing::warn!("Refused response to {} by {}: {}", event_id, user.profile_id, e);
            e
        })?;

    let mut tx = pool.begin().await?;
    let stored = db::record_response(&mut *tx, event.id, recipient.id, plan.status, plan.event.responded_at)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Request {} was answered concurrently", event_id);
            BackendError::conflict("This request has already been answered")
        })?;

    for contact in &plan.contacts {
        upsert_contact(&mut *tx, contact).await.map_err(|e| {
            tracing::error!("Failed to seed contact for {}, rolling back: {:?}", contact.owner_id, e);
            e
        })?;
    }
    tx.commit().await?;

    tracing::info!("Request {} {}", event_id, plan.status.as_str());

    if let Some(sender_id) = stored.sender.profile_id() {
        broadcast_event(
            &state.realtime_broadcast,
            RealtimeEvent::request_status(sender_id, stored.id, plan.status.as_str()),
        )
        .await;
    }

    if let Some(email) = &plan.notification {
        dispatch_best_effort(state.dispatcher.as_ref(), email).await;
    }

    Ok(Json(stored))
}

async fn received_views(pool: &PgPool, events: Vec<EventWithMailbox>) -> Result<Vec<EventView>, BackendError> {
    let sender_ids: Vec<Uuid> = events.iter().filter_map(|(e, _)| e.sender.profile_id()).collect();
    let senders = get_profiles_by_ids(pool, &sender_ids).await?;
    Ok(events
        .into_iter()
        .map(|(event, mailbox_name)| {
            let sender = event.sender.profile_id().and_then(|id| senders.get(&id));
            EventView::received(event, mailbox_name, sender)
        })
        .collect())
}

/// Rings received by the caller (GET /api/rings)
pub async fn list_rings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let rings = db::list_rings(pool, user.profile_id).await?;
    Ok(Json(received_views(pool, rings).await?))
}

/// PATCH /api/rings/{id}/read
pub async fn mark_ring_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(ring_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    if !db::mark_ring_read(pool, ring_id, user.profile_id).await? {
        return Err(BackendError::not_found("Ring not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/rings/{id}
pub async fn delete_ring(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(ring_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    if !db::delete_ring(pool, ring_id, user.profile_id).await? {
        return Err(BackendError::not_found("Ring not found"));
    }
    tracing::info!("Ring {} deleted", ring_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard/counts
pub async fn dashboard_counts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<DashboardCounts>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    Ok(Json(db::dashboard_counts(pool, user.profile_id).await?))
}

/// Requests received by the caller (GET /api/requests/received)
pub async fn list_received_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let requests = db::list_received_requests(pool, user.profile_id).await?;
    Ok(Json(received_views(pool, requests).await?))
}

/// Requests sent by the caller (GET /api/requests/sent)
///
/// The recipient's name and email appear once a request is accepted.
pub async fn list_sent_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let pool = require_pool(&state.db_pool)?;
    let requests = db::list_sent_requests(pool, user.profile_id).await?;

    let recipient_ids: Vec<Uuid> = requests.iter().map(|(e, _)| e.recipient_id).collect();
    let recipients = get_profiles_by_ids(pool, &recipient_ids).await?;

    Ok(Json(
        requests
            .into_iter()
            .filter_map(|(event, mailbox_name)| {
                let recipient = recipients.get(&event.recipient_id)?;
                Some(EventView::sent(event, mailbox_name, recipient))
            })
            .collect(),
    ))
}
