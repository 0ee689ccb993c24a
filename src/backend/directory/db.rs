//! Database operations for the directory
//!
//! Addresses, mailboxes and the directory search. Joined queries alias address
//! columns with an `a_` prefix.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::directory::search::{like_pattern, DIRECTORY_RESULT_LIMIT};
use crate::shared::directory::{Address, CreateMailboxRequest, Mailbox, NewAddress, OwnedMailbox, PresenceStatus};

const MAILBOX_COLUMNS: &str = "m.id, m.owner_id, m.address_id, m.display_name, m.presence, \
     m.visible_in_directory, m.red_list, m.created_at, m.updated_at";

const JOINED_ADDRESS_COLUMNS: &str = "a.id AS a_id, a.ban_id AS a_ban_id, a.label AS a_label, \
     a.housenumber AS a_housenumber, a.street AS a_street, a.postcode AS a_postcode, a.city AS a_city, \
     a.citycode AS a_citycode, a.latitude AS a_latitude, a.longitude AS a_longitude, \
     a.created_at AS a_created_at";

pub(crate) fn mailbox_from_row(row: &PgRow) -> Result<Mailbox, sqlx::Error> {
    let presence: String = row.try_get("presence")?;
    Ok(Mailbox {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        address_id: row.try_get("address_id")?,
        display_name: row.try_get("display_name")?,
        presence: PresenceStatus::from_str(&presence).unwrap_or_default(),
        visible_in_directory: row.try_get("visible_in_directory")?,
        red_list: row.try_get("red_list")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn address_from_row(row: &PgRow, prefix: &str) -> Result<Address, sqlx::Error> {
    let col = |name: &str| format!("{}{}", prefix, name);
    Ok(Address {
        id: row.try_get(col("id").as_str())?,
        ban_id: row.try_get(col("ban_id").as_str())?,
        label: row.try_get(col("label").as_str())?,
        housenumber: row.try_get(col("housenumber").as_str())?,
        street: row.try_get(col("street").as_str())?,
        postcode: row.try_get(col("postcode").as_str())?,
        city: row.try_get(col("city").as_str())?,
        citycode: row.try_get(col("citycode").as_str())?,
        latitude: row.try_get(col("latitude").as_str())?,
        longitude: row.try_get(col("longitude").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
    })
}

fn owned_from_row(row: &PgRow) -> Result<OwnedMailbox, sqlx::Error> {
    Ok(OwnedMailbox {
        mailbox: mailbox_from_row(row)?,
        address: address_from_row(row, "a_")?,
    })
}

/// Find or create an address, keyed on `ban_id`
pub async fn upsert_address(pool: &PgPool, address: &NewAddress) -> Result<Address, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO addresses (id, ban_id, label, housenumber, street, postcode, city, citycode, latitude, longitude, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (ban_id) DO UPDATE SET label = EXCLUDED.label
        RETURNING id, ban_id, label, housenumber, street, postcode, city, citycode, latitude, longitude, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(address.ban_id.trim())
    .bind(address.label.trim())
    .bind(&address.housenumber)
    .bind(&address.street)
    .bind(address.postcode.trim())
    .bind(address.city.trim())
    .bind(&address.citycode)
    .bind(address.latitude)
    .bind(address.longitude)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    address_from_row(&row, "")
}

/// Create a mailbox for `owner_id` on an existing address
pub async fn create_mailbox(
    pool: &PgPool,
    owner_id: Uuid,
    address_id: Uuid,
    request: &CreateMailboxRequest,
) -> Result<Mailbox, sqlx::Error> {
    let now = Utc::now();
    let query = format!(
        r#"
        INSERT INTO mailboxes AS m (id, owner_id, address_id, display_name, presence, visible_in_directory, red_list, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {}
        "#,
        MAILBOX_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(address_id)
        .bind(request.display_name.trim())
        .bind(request.presence.as_str())
        .bind(request.visible_in_directory)
        .bind(request.red_list)
        .bind(now)
        .fetch_one(pool)
        .await?;

    mailbox_from_row(&row)
}

/// Get a mailbox with its address
pub async fn get_mailbox_with_address(pool: &PgPool, id: Uuid) -> Result<Option<OwnedMailbox>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}, {}
        FROM mailboxes m
        JOIN addresses a ON a.id = m.address_id
        WHERE m.id = $1
        "#,
        MAILBOX_COLUMNS, JOINED_ADDRESS_COLUMNS
    );
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(owned_from_row).transpose()
}

/// Get a mailbox
pub async fn get_mailbox(pool: &PgPool, id: Uuid) -> Result<Option<Mailbox>, sqlx::Error> {
    let query = format!("SELECT {} FROM mailboxes m WHERE m.id = $1", MAILBOX_COLUMNS);
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(mailbox_from_row).transpose()
}

/// Mailboxes owned by a profile, newest first
pub async fn list_owned_mailboxes(pool: &PgPool, owner_id: Uuid) -> Result<Vec<OwnedMailbox>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}, {}
        FROM mailboxes m
        JOIN addresses a ON a.id = m.address_id
        WHERE m.owner_id = $1
        ORDER BY m.created_at DESC
        "#,
        MAILBOX_COLUMNS, JOINED_ADDRESS_COLUMNS
    );
    let rows = sqlx::query(&query).bind(owner_id).fetch_all(pool).await?;
    rows.iter().map(owned_from_row).collect()
}

/// Persist visibility, red list and presence of an owned mailbox
pub async fn save_mailbox_state(pool: &PgPool, mailbox: &Mailbox) -> Result<Option<Mailbox>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE mailboxes AS m
        SET visible_in_directory = $3,
            red_list = $4,
            presence = $5,
            updated_at = NOW()
        WHERE m.id = $1 AND m.owner_id = $2
        RETURNING {}
        "#,
        MAILBOX_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(mailbox.id)
        .bind(mailbox.owner_id)
        .bind(mailbox.visible_in_directory)
        .bind(mailbox.red_list)
        .bind(mailbox.presence.as_str())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(mailbox_from_row).transpose()
}

/// Delete an owned mailbox
pub async fn delete_mailbox(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM mailboxes WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Listed mailboxes matching a normalized query, newest first
///
/// Red-listed mailboxes match on their name only.
pub async fn search_directory(pool: &PgPool, normalized_query: &str) -> Result<Vec<OwnedMailbox>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}, {}
        FROM mailboxes m
        JOIN addresses a ON a.id = m.address_id
        WHERE m.visible_in_directory
          AND (
            m.display_name ILIKE $1 ESCAPE '\'
            OR (NOT m.red_list AND (
                a.city ILIKE $1 ESCAPE '\'
                OR a.postcode ILIKE $1 ESCAPE '\'
                OR COALESCE(a.street, '') ILIKE $1 ESCAPE '\'
            ))
          )
        ORDER BY m.created_at DESC
        LIMIT $2
        "#,
        MAILBOX_COLUMNS, JOINED_ADDRESS_COLUMNS
    );
    let rows = sqlx::query(&query)
        .bind(like_pattern(normalized_query))
        .bind(DIRECTORY_RESULT_LIMIT)
        .fetch_all(pool)
        .await?;
    rows.iter().map(owned_from_row).collect()
}
