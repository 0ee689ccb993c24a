/**
 * Profile Model and Database Operations
 *
 * Profiles are the accounts of the service. The password hash lives on the row and
 * never leaves this module: callers get a `shared::directory::Profile`.
 */

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::sessions::RESET_TOKEN_TTL_MINUTES;
use crate::shared::directory::{Profile, ProfileUpdate};

const PROFILE_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
     email_notifications_enabled, created_at, updated_at";

/// Profile row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email_notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email_notifications_enabled: self.email_notifications_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields needed to create a profile
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a new profile
pub async fn create_profile(pool: &PgPool, new: NewProfile) -> Result<ProfileRow, sqlx::Error> {
    let now = Utc::now();
    let query = format!(
        r#"
        INSERT INTO profiles (id, email, password_hash, first_name, last_name, phone, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {}
        "#,
        PROFILE_COLUMNS
    );

    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(Uuid::new_v4())
        .bind(normalize_email(&new.email))
        .bind(&new.password_hash)
        .bind(new.first_name.trim())
        .bind(new.last_name.trim())
        .bind(new.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()))
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Get profile by email
pub async fn get_profile_by_email(pool: &PgPool, email: &str) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!("SELECT {} FROM profiles WHERE email = $1", PROFILE_COLUMNS);
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
}

/// Get profile by ID
pub async fn get_profile_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get profile by ID, without the password hash
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    Ok(get_profile_by_id(pool, id).await?.map(ProfileRow::into_profile))
}

/// Profiles for a set of IDs, without password hashes
pub async fn get_profiles_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, Profile>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let query = format!("SELECT {} FROM profiles WHERE id = ANY($1)", PROFILE_COLUMNS);
    let rows = sqlx::query_as::<_, ProfileRow>(&query)
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.id, row.into_profile()))
        .collect())
}

/// Update editable profile fields
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: &ProfileUpdate,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE profiles
        SET first_name = $2,
            last_name = $3,
            phone = $4,
            email_notifications_enabled = COALESCE($5, email_notifications_enabled),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PROFILE_COLUMNS
    );
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .bind(update.email_notifications_enabled)
        .fetch_optional(pool)
        .await
}

/// Replace the password hash
pub async fn update_password_hash(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE profiles SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete an account and everything hanging off it
pub async fn delete_account(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT delete_user_account($1)")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Store a hashed reset token
pub async fn store_reset_token(pool: &PgPool, profile_id: Uuid, token_hash: &str) -> Result<(), sqlx::Error> {
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    sqlx::query(
        r#"
        INSERT INTO password_resets (token_hash, profile_id, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(token_hash)
    .bind(profile_id)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Mark a reset token as used and return its profile
///
/// Returns `None` for unknown, expired, or already used tokens.
pub async fn consume_reset_token(pool: &PgPool, token_hash: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let profile_id: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE password_resets
        SET used_at = NOW()
        WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
        RETURNING profile_id
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;
    Ok(profile_id)
}
