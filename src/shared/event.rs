/**
 * Real-time Event System
 *
 * This module defines the events pushed to a recipient's realtime feed. Events are
 * triggers only: a client receiving one re-fetches the corresponding list, so
 * duplicated or reordered events are harmless.
 */
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of real-time event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A visitor rang one of the recipient's mailboxes
    Ring,
    /// A new contact request arrived
    ContactRequest,
    /// One of the recipient's sent requests was answered
    RequestStatus,
    /// A new direct message arrived
    Message,
}

impl EventType {
    /// Name used for the SSE `event:` field
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Ring => "ring",
            EventType::ContactRequest => "contact_request",
            EventType::RequestStatus => "request_status",
            EventType::Message => "message",
        }
    }
}

/// Real-time event addressed to a single profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event_type: EventType,
    /// Profile that should receive the event
    pub recipient_id: Uuid,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when event occurred (RFC3339)
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event_type: EventType, recipient_id: Uuid, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            recipient_id,
            payload,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// A ring was recorded against one of the recipient's mailboxes
    pub fn ring(recipient_id: Uuid, event_id: Uuid, mailbox_id: Uuid) -> Self {
        Self::new(
            EventType::Ring,
            recipient_id,
            serde_json::json!({ "id": event_id, "mailbox_id": mailbox_id }),
        )
    }

    /// A contact request was recorded against one of the recipient's mailboxes
    pub fn contact_request(recipient_id: Uuid, event_id: Uuid, mailbox_id: Uuid) -> Self {
        Self::new(
            EventType::ContactRequest,
            recipient_id,
            serde_json::json!({ "id": event_id, "mailbox_id": mailbox_id }),
        )
    }

    /// A request sent by `recipient_id` reached a terminal status
    pub fn request_status(recipient_id: Uuid, event_id: Uuid, status: &str) -> Self {
        Self::new(
            EventType::RequestStatus,
            recipient_id,
            serde_json::json!({ "id": event_id, "status": status }),
        )
    }

    /// A direct message was stored for `recipient_id`
    pub fn message(recipient_id: Uuid, message_id: Uuid, sender_id: Uuid) -> Self {
        Self::new(
            EventType::Message,
            recipient_id,
            serde_json::json!({ "id": message_id, "sender_id": sender_id }),
        )
    }

    /// Whether this event belongs to the given profile's feed
    pub fn is_for(&self, profile_id: Uuid) -> bool {
        self.recipient_id == profile_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_event() {
        let recipient = Uuid::new_v4();
        let id = Uuid::new_v4();
        let mailbox = Uuid::new_v4();
        let event = RealtimeEvent::ring(recipient, id, mailbox);
        assert_eq!(event.event_type, EventType::Ring);
        assert_eq!(event.payload["id"], serde_json::json!(id));
        assert!(event.is_for(recipient));
        assert!(!event.is_for(Uuid::new_v4()));
    }

    #[test]
    fn test_request_status_event() {
        let event = RealtimeEvent::request_status(Uuid::new_v4(), Uuid::new_v4(), "accepted");
        assert_eq!(event.event_type, EventType::RequestStatus);
        assert_eq!(event.payload["status"], "accepted");
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::Ring.as_str(), "ring");
        assert_eq!(EventType::ContactRequest.as_str(), "contact_request");
        let json = serde_json::to_string(&EventType::RequestStatus).unwrap();
        assert_eq!(json, "\"request_status\"");
    }
}
