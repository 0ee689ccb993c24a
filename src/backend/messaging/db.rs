//! Database operations for messaging
//!
//! This module contains database operations for address-book contacts and
//! direct messages.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};
use uuid::Uuid;

use crate::shared::messaging::{Contact, DirectMessage, NewContact};

const CONTACT_COLUMNS: &str =
    "id, owner_id, contact_user_id, mailbox_id, display_name, email, phone, notes, created_at";

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, contact_event_id, body, read, created_at";

fn contact_from_row(row: &PgRow) -> Result<Contact, sqlx::Error> {
    Ok(Contact {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        contact_user_id: row.try_get("contact_user_id")?,
        mailbox_id: row.try_get("mailbox_id")?,
        display_name: row.try_get("display_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn message_from_row(row: &PgRow) -> Result<DirectMessage, sqlx::Error> {
    Ok(DirectMessage {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        recipient_id: row.try_get("recipient_id")?,
        contact_event_id: row.try_get("contact_event_id")?,
        body: row.try_get("body")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Create an address-book entry, or refresh its details
///
/// Notes are kept; an existing mailbox link is kept when the new entry has none.
pub async fn upsert_contact(executor: impl PgExecutor<'_>, contact: &NewContact) -> Result<Contact, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO contacts (id, owner_id, contact_user_id, mailbox_id, display_name, email, phone, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (owner_id, contact_user_id) DO UPDATE
        SET display_name = EXCLUDED.display_name,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            mailbox_id = COALESCE(EXCLUDED.mailbox_id, contacts.mailbox_id)
        RETURNING {}
        "#,
        CONTACT_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(contact.owner_id)
        .bind(contact.contact_user_id)
        .bind(contact.mailbox_id)
        .bind(&contact.display_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
    contact_from_row(&row)
}

/// Get all contacts of a profile, by name
pub async fn get_contacts(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Contact>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM contacts WHERE owner_id = $1 ORDER BY display_name ASC",
        CONTACT_COLUMNS
    );
    let rows = sqlx::query(&query).bind(owner_id).fetch_all(pool).await?;
    rows.iter().map(contact_from_row).collect()
}

/// Whether `contact_user_id` is in the address book of `owner_id`
pub async fn has_contact(pool: &PgPool, owner_id: Uuid, contact_user_id: Uuid) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM contacts WHERE owner_id = $1 AND contact_user_id = $2)",
    )
    .bind(owner_id)
    .bind(contact_user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Replace the notes of an owned contact
pub async fn update_contact_notes(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    notes: Option<&str>,
) -> Result<Option<Contact>, sqlx::Error> {
    let query = format!(
        "UPDATE contacts SET notes = $3 WHERE id = $1 AND owner_id = $2 RETURNING {}",
        CONTACT_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(owner_id)
        .bind(notes)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(contact_from_row).transpose()
}

/// Delete an owned contact
pub async fn delete_contact(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Store a message
pub async fn insert_message(
    pool: &PgPool,
    sender_id: Uuid,
    recipient_id: Uuid,
    contact_event_id: Option<Uuid>,
    body: &str,
) -> Result<DirectMessage, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO messages (id, sender_id, recipient_id, contact_event_id, body, read, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6)
        RETURNING {}
        "#,
        MESSAGE_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(sender_id)
        .bind(recipient_id)
        .bind(contact_event_id)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
    message_from_row(&row)
}

/// The thread between two profiles, oldest first
pub async fn get_thread(pool: &PgPool, a: Uuid, b: Uuid) -> Result<Vec<DirectMessage>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}
        FROM messages
        WHERE (sender_id = $1 AND recipient_id = $2) OR (sender_id = $2 AND recipient_id = $1)
        ORDER BY created_at ASC
        "#,
        MESSAGE_COLUMNS
    );
    let rows = sqlx::query(&query).bind(a).bind(b).fetch_all(pool).await?;
    rows.iter().map(message_from_row).collect()
}

/// Mark every message from `sender_id` to `recipient_id` as read
pub async fn mark_thread_read(pool: &PgPool, recipient_id: Uuid, sender_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET read = TRUE WHERE recipient_id = $1 AND sender_id = $2 AND NOT read",
    )
    .bind(recipient_id)
    .bind(sender_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
