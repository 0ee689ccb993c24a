//! Contact Event Data Structure
//!
//! Rings and contact requests share one record type. A ring is terminal as soon as
//! it is created; a request starts `pending` and is moved exactly once, by its
//! recipient, to `accepted` or `declined`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::intercom::IntercomError;

/// Status of a contact request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "accepted" => Some(RequestStatus::Accepted),
            "declined" => Some(RequestStatus::Declined),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Apply a recipient decision; only `pending` can move
    pub fn apply(self, decision: Decision) -> Result<RequestStatus, SharedError> {
        let target = decision.target();
        if self.is_terminal() {
            return Err(SharedError::transition(self.as_str(), target.as_str()));
        }
        Ok(target)
    }
}

/// Recipient's answer to a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Decline,
}

impl Decision {
    pub fn target(&self) -> RequestStatus {
        match self {
            Decision::Accept => RequestStatus::Accepted,
            Decision::Decline => RequestStatus::Declined,
        }
    }
}

/// Ring or request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContactEventKind {
    Ring,
    Request { status: RequestStatus },
}

impl ContactEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactEventKind::Ring => "ring",
            ContactEventKind::Request { .. } => "request",
        }
    }

    pub fn status(&self) -> Option<RequestStatus> {
        match self {
            ContactEventKind::Ring => None,
            ContactEventKind::Request { status } => Some(*status),
        }
    }

    /// Rebuild from the `kind` and `status` columns
    pub fn from_columns(kind: &str, status: Option<&str>) -> Result<Self, SharedError> {
        match (kind, status) {
            ("ring", None) => Ok(ContactEventKind::Ring),
            ("request", Some(status)) => RequestStatus::from_str(status)
                .map(|status| ContactEventKind::Request { status })
                .ok_or_else(|| SharedError::serialization(format!("unknown request status '{}'", status))),
            (kind, status) => Err(SharedError::serialization(format!(
                "inconsistent contact event kind '{}' with status {:?}",
                kind, status
            ))),
        }
    }
}

/// Who submitted the event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sender {
    Authenticated { profile_id: Uuid, display_name: String },
    Anonymous { display_name: String },
}

impl Sender {
    pub fn profile_id(&self) -> Option<Uuid> {
        match self {
            Sender::Authenticated { profile_id, .. } => Some(*profile_id),
            Sender::Anonymous { .. } => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Sender::Authenticated { display_name, .. } | Sender::Anonymous { display_name } => {
                display_name
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Sender::Authenticated { .. })
    }

    /// Rebuild from the `sender_id` and `sender_name` columns
    pub fn from_columns(sender_id: Option<Uuid>, sender_name: String) -> Self {
        match sender_id {
            Some(profile_id) => Sender::Authenticated {
                profile_id,
                display_name: sender_name,
            },
            None => Sender::Anonymous {
                display_name: sender_name,
            },
        }
    }
}

/// A ring or a contact request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactEvent {
    pub id: Uuid,
    pub kind: ContactEventKind,
    pub sender: Sender,
    pub recipient_id: Uuid,
    pub mailbox_id: Uuid,
    pub message: String,
    /// Effective flag: the sender is authenticated and has a phone on file
    pub share_phone: bool,
    /// Effective flag: the sender is authenticated and has an email on file
    pub share_email: bool,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ContactEvent {
    pub fn is_ring(&self) -> bool {
        matches!(self.kind, ContactEventKind::Ring)
    }

    pub fn status(&self) -> Option<RequestStatus> {
        self.kind.status()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == Some(RequestStatus::Pending)
    }

    /// Move a pending request to the decided status
    ///
    /// Only the recipient may respond, rings cannot be responded to, and a
    /// terminal status never changes.
    pub fn respond(
        &mut self,
        responder_id: Uuid,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<RequestStatus, IntercomError> {
        let current = match self.kind {
            ContactEventKind::Ring => return Err(IntercomError::NotARequest),
            ContactEventKind::Request { status } => status,
        };
        if responder_id != self.recipient_id {
            return Err(IntercomError::Forbidden);
        }
        let next = current.apply(decision).map_err(|_| IntercomError::AlreadyResponded {
            status: current,
        })?;
        self.kind = ContactEventKind::Request { status: next };
        self.responded_at = Some(now);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(status: RequestStatus) -> ContactEvent {
        ContactEvent {
            id: Uuid::new_v4(),
            kind: ContactEventKind::Request { status },
            sender: Sender::Anonymous {
                display_name: "Jean".to_string(),
            },
            recipient_id: Uuid::new_v4(),
            mailbox_id: Uuid::new_v4(),
            message: "Bonjour".to_string(),
            share_phone: false,
            share_email: false,
            read: false,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
        assert!(!RequestStatus::Pending.is_terminal());
    }

    #[test]
    fn test_terminal_status_cannot_move() {
        for status in [RequestStatus::Accepted, RequestStatus::Declined] {
            for decision in [Decision::Accept, Decision::Decline] {
                assert_matches!(status.apply(decision), Err(SharedError::TransitionError { .. }));
            }
        }
    }

    #[test]
    fn test_respond_by_recipient() {
        let mut event = request(RequestStatus::Pending);
        let recipient = event.recipient_id;
        let status = event.respond(recipient, Decision::Accept, Utc::now()).unwrap();
        assert_eq!(status, RequestStatus::Accepted);
        assert!(event.responded_at.is_some());
        assert_eq!(event.status(), Some(RequestStatus::Accepted));
    }

    #[test]
    fn test_second_response_is_rejected() {
        let mut event = request(RequestStatus::Pending);
        let recipient = event.recipient_id;
        event.respond(recipient, Decision::Accept, Utc::now()).unwrap();
        let err = event.respond(recipient, Decision::Decline, Utc::now()).unwrap_err();
        assert_eq!(err, IntercomError::AlreadyResponded { status: RequestStatus::Accepted });
        assert_eq!(event.status(), Some(RequestStatus::Accepted));
    }

    #[test]
    fn test_only_recipient_may_respond() {
        let mut event = request(RequestStatus::Pending);
        let err = event.respond(Uuid::new_v4(), Decision::Accept, Utc::now()).unwrap_err();
        assert_eq!(err, IntercomError::Forbidden);
        assert!(event.is_pending());
    }

    #[test]
    fn test_ring_cannot_be_responded_to() {
        let mut event = request(RequestStatus::Pending);
        event.kind = ContactEventKind::Ring;
        let recipient = event.recipient_id;
        assert_eq!(
            event.respond(recipient, Decision::Accept, Utc::now()),
            Err(IntercomError::NotARequest)
        );
    }

    #[test]
    fn test_kind_from_columns() {
        assert_eq!(ContactEventKind::from_columns("ring", None).unwrap(), ContactEventKind::Ring);
        assert_eq!(
            ContactEventKind::from_columns("request", Some("declined")).unwrap(),
            ContactEventKind::Request { status: RequestStatus::Declined }
        );
        assert!(ContactEventKind::from_columns("ring", Some("pending")).is_err());
        assert!(ContactEventKind::from_columns("request", None).is_err());
        assert!(ContactEventKind::from_columns("request", Some("maybe")).is_err());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_value(ContactEventKind::Ring).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "ring" }));
        let json = serde_json::to_value(ContactEventKind::Request { status: RequestStatus::Pending }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "request", "status": "pending" }));
    }

    #[test]
    fn test_sender_from_columns() {
        let id = Uuid::new_v4();
        let sender = Sender::from_columns(Some(id), "Marie Curie".to_string());
        assert_eq!(sender.profile_id(), Some(id));
        assert!(sender.is_authenticated());
        let sender = Sender::from_columns(None, "Jean".to_string());
        assert_eq!(sender.display_name(), "Jean");
        assert!(!sender.is_authenticated());
    }
}
