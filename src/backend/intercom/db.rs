//! Database operations for rings and contact requests
//!
//! Both live in `contact_events`; a CHECK constraint ties `status` to `kind`.
//! List queries join the mailbox to return its display name alongside each event.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};
use uuid::Uuid;

use crate::shared::intercom::{ContactEvent, ContactEventKind, DashboardCounts, RequestStatus, Sender};

const EVENT_COLUMNS: &str = "e.id, e.kind, e.status, e.sender_id, e.sender_name, e.recipient_id, \
     e.mailbox_id, e.message, e.share_phone, e.share_email, e.read, e.created_at, e.responded_at";

/// An event with the display name of its mailbox
pub type EventWithMailbox = (ContactEvent, String);

fn event_from_row(row: &PgRow) -> Result<ContactEvent, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    let status: Option<String> = row.try_get("status")?;
    let kind = ContactEventKind::from_columns(&kind, status.as_deref())
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(ContactEvent {
        id: row.try_get("id")?,
        kind,
        sender: Sender::from_columns(row.try_get("sender_id")?, row.try_get("sender_name")?),
        recipient_id: row.try_get("recipient_id")?,
        mailbox_id: row.try_get("mailbox_id")?,
        message: row.try_get("message")?,
        share_phone: row.try_get("share_phone")?,
        share_email: row.try_get("share_email")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
        responded_at: row.try_get("responded_at")?,
    })
}

fn event_with_mailbox(row: &PgRow) -> Result<EventWithMailbox, sqlx::Error> {
    Ok((event_from_row(row)?, row.try_get("mailbox_name")?))
}

/// Store a new ring or request
pub async fn insert_event(pool: &PgPool, event: &ContactEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO contact_events
            (id, kind, status, sender_id, sender_name, recipient_id, mailbox_id, message,
             share_phone, share_email, read, created_at, responded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(event.id)
    .bind(event.kind.as_str())
    .bind(event.status().map(|s| s.as_str()))
    .bind(event.sender.profile_id())
    .bind(event.sender.display_name())
    .bind(event.recipient_id)
    .bind(event.mailbox_id)
    .bind(&event.message)
    .bind(event.share_phone)
    .bind(event.share_email)
    .bind(event.read)
    .bind(event.created_at)
    .bind(event.responded_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Get an event with its mailbox name
pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Option<EventWithMailbox>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}, m.display_name AS mailbox_name
        FROM contact_events e
        JOIN mailboxes m ON m.id = e.mailbox_id
        WHERE e.id = $1
        "#,
        EVENT_COLUMNS
    );
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(event_with_mailbox).transpose()
}

/// Move a pending request to a terminal status
///
/// Returns `None` when the request is no longer pending, so only the first
/// response is ever stored. Runs on a pool or inside a transaction.
pub async fn record_response(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    recipient_id: Uuid,
    status: RequestStatus,
    responded_at: Option<DateTime<Utc>>,
) -> Result<Option<ContactEvent>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE contact_events AS e
        SET status = $3, responded_at = $4
        WHERE e.id = $1 AND e.recipient_id = $2 AND e.kind = 'request' AND e.status = 'pending'
        RETURNING {}
        "#,
        EVENT_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(recipient_id)
        .bind(status.as_str())
        .bind(responded_at)
        .fetch_optional(executor)
        .await?;
    row.as_ref().map(event_from_row).transpose()
}

async fn list_received(pool: &PgPool, recipient_id: Uuid, kind: &str) -> Result<Vec<EventWithMailbox>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}, m.display_name AS mailbox_name
        FROM contact_events e
        JOIN mailboxes m ON m.id = e.mailbox_id
        WHERE e.recipient_id = $1 AND e.kind = $2
        ORDER BY e.created_at DESC
        "#,
        EVENT_COLUMNS
    );
    let rows = sqlx::query(&query)
        .bind(recipient_id)
        .bind(kind)
        .fetch_all(pool)
        .await?;
    rows.iter().map(event_with_mailbox).collect()
}

/// Rings received by a profile, newest first
pub async fn list_rings(pool: &PgPool, recipient_id: Uuid) -> Result<Vec<EventWithMailbox>, sqlx::Error> {
    list_received(pool, recipient_id, "ring").await
}

/// Requests received by a profile, newest first
pub async fn list_received_requests(
    pool: &PgPool,
    recipient_id: Uuid,
) -> Result<Vec<EventWithMailbox>, sqlx::Error> {
    list_received(pool, recipient_id, "request").await
}

/// Requests sent by a profile, newest first
pub async fn list_sent_requests(pool: &PgPool, sender_id: Uuid) -> Result<Vec<EventWithMailbox>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}, m.display_name AS mailbox_name
        FROM contact_events e
        JOIN mailboxes m ON m.id = e.mailbox_id
        WHERE e.sender_id = $1 AND e.kind = 'request'
        ORDER BY e.created_at DESC
        "#,
        EVENT_COLUMNS
    );
    let rows = sqlx::query(&query).bind(sender_id).fetch_all(pool).await?;
    rows.iter().map(event_with_mailbox).collect()
}

/// Mark a ring as read
pub async fn mark_ring_read(pool: &PgPool, id: Uuid, recipient_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE contact_events SET read = TRUE WHERE id = $1 AND recipient_id = $2 AND kind = 'ring'",
    )
    .bind(id)
    .bind(recipient_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a ring
pub async fn delete_ring(pool: &PgPool, id: Uuid, recipient_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contact_events WHERE id = $1 AND recipient_id = $2 AND kind = 'ring'")
        .bind(id)
        .bind(recipient_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Unread rings and pending requests for the dashboard
pub async fn dashboard_counts(pool: &PgPool, recipient_id: Uuid) -> Result<DashboardCounts, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE kind = 'ring' AND NOT read) AS unread_rings,
            COUNT(*) FILTER (WHERE kind = 'request' AND status = 'pending') AS pending_requests
        FROM contact_events
        WHERE recipient_id = $1
        "#,
    )
    .bind(recipient_id)
    .fetch_one(pool)
    .await?;

    Ok(DashboardCounts {
        unread_rings: row.try_get("unread_rings")?,
        pending_requests: row.try_get("pending_requests")?,
    })
}

/// Most recent accepted request between two profiles, in either direction
pub async fn latest_accepted_request(pool: &PgPool, a: Uuid, b: Uuid) -> Result<Option<ContactEvent>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}
        FROM contact_events e
        WHERE e.kind = 'request' AND e.status = 'accepted'
          AND ((e.sender_id = $1 AND e.recipient_id = $2) OR (e.sender_id = $2 AND e.recipient_id = $1))
        ORDER BY e.responded_at DESC NULLS LAST
        LIMIT 1
        "#,
        EVENT_COLUMNS
    );
    let row = sqlx::query(&query).bind(a).bind(b).fetch_optional(pool).await?;
    row.as_ref().map(event_from_row).transpose()
}
