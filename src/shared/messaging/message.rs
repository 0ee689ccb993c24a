//! Direct Message Data Structure
//!
//! Represents a message exchanged between two users who are in each other's
//! address book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_text, SharedError};

/// Maximum message body length, in characters
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Represents a direct message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectMessage {
    /// Unique message ID
    pub id: Uuid,
    /// User who sent the message
    pub sender_id: Uuid,
    /// User who receives the message
    pub recipient_id: Uuid,
    /// Contact request the conversation started from, if any
    pub contact_event_id: Option<Uuid>,
    /// Message content
    pub body: String,
    /// Whether the recipient has opened the thread since
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
    #[serde(default)]
    pub contact_event_id: Option<Uuid>,
}

impl SendMessageRequest {
    /// Trimmed body, or a validation error
    pub fn validated_body(&self) -> Result<String, SharedError> {
        let body = require_text("body", &self.body)?;
        if body.chars().count() > MAX_MESSAGE_LEN {
            return Err(SharedError::validation(
                "body",
                format!("Message cannot exceed {} characters", MAX_MESSAGE_LEN),
            ));
        }
        Ok(body.to_string())
    }
}

/// Response for listing a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<DirectMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_body() {
        let request = SendMessageRequest { body: "  Bonjour  ".to_string(), contact_event_id: None };
        assert_eq!(request.validated_body().unwrap(), "Bonjour");
    }

    #[test]
    fn test_empty_body_rejected() {
        let request = SendMessageRequest { body: " \n ".to_string(), contact_event_id: None };
        assert!(request.validated_body().unwrap_err().is_validation());
    }

    #[test]
    fn test_long_body_rejected() {
        let request = SendMessageRequest { body: "a".repeat(MAX_MESSAGE_LEN + 1), contact_event_id: None };
        assert!(request.validated_body().is_err());
    }
}
