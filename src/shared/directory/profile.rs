/**
 * Profile Types
 *
 * A profile is the identity-side record of a resident or visitor. It is created at
 * signup and owns mailboxes, contacts and messages.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_text, SharedError};

/// Minimum password length accepted at signup
pub const SIGNUP_PASSWORD_MIN_LEN: usize = 6;

/// Minimum password length accepted when changing or resetting a password
pub const CHANGE_PASSWORD_MIN_LEN: usize = 8;

/// Profile as exposed to its owner (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email_notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// "First Last", trimmed
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    /// Phone number if one is on file
    pub fn contact_phone(&self) -> Option<&str> {
        non_empty(self.phone.as_deref())
    }

    /// Email address if one is on file
    pub fn contact_email(&self) -> Option<&str> {
        non_empty(Some(self.email.as_str()))
    }

    /// Address to send notifications to, if the owner accepts them
    pub fn notification_address(&self) -> Option<&str> {
        if self.email_notifications_enabled {
            self.contact_email()
        } else {
            None
        }
    }
}

/// Derived display name
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim()).trim().to_string()
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Editable profile fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email_notifications_enabled: Option<bool>,
}

impl ProfileUpdate {
    /// Trim names and normalise an empty phone to `None`
    pub fn normalized(&self) -> Result<ProfileUpdate, SharedError> {
        Ok(ProfileUpdate {
            first_name: require_text("first_name", &self.first_name)?.to_string(),
            last_name: require_text("last_name", &self.last_name)?.to_string(),
            phone: non_empty(self.phone.as_deref()).map(str::to_string),
            email_notifications_enabled: self.email_notifications_enabled,
        })
    }
}

/// Validate signup input
pub fn validate_signup(
    email: &str,
    password: &str,
    confirm_password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), SharedError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(SharedError::validation("name", "First name and last name are required"));
    }
    if !email.contains('@') {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    if password != confirm_password {
        return Err(SharedError::validation("confirm_password", "Passwords do not match"));
    }
    if password.chars().count() < SIGNUP_PASSWORD_MIN_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", SIGNUP_PASSWORD_MIN_LEN),
        ));
    }
    Ok(())
}

/// Validate a replacement password (change or reset)
pub fn validate_new_password(new_password: &str, confirm_password: &str) -> Result<(), SharedError> {
    if new_password != confirm_password {
        return Err(SharedError::validation("confirm_password", "Passwords do not match"));
    }
    if new_password.chars().count() < CHANGE_PASSWORD_MIN_LEN {
        return Err(SharedError::validation(
            "new_password",
            format!("Password must be at least {} characters", CHANGE_PASSWORD_MIN_LEN),
        ));
    }
    if !new_password.chars().any(|c| c.is_ascii_digit()) {
        return Err(SharedError::validation(
            "new_password",
            "Password must contain at least one digit",
        ));
    }
    Ok(())
}
