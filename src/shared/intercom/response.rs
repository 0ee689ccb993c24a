//! Contact-request responses.
//!
//! Accepting tells the sender how to reach the recipient and seeds both address
//! books. Declining tells the sender only that the request was declined.

use chrono::{DateTime, Utc};

use crate::shared::directory::profile::Profile;
use crate::shared::intercom::contact_event::{ContactEvent, Decision, RequestStatus};
use crate::shared::intercom::notification::{compose_accepted, compose_declined, EmailNotification};
use crate::shared::intercom::submission::stored_disclosure;
use crate::shared::intercom::IntercomError;
use crate::shared::messaging::contact::NewContact;

/// Outcome of a successful response plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePlan {
    /// The event after the transition
    pub event: ContactEvent,
    pub status: RequestStatus,
    /// Email for the sender, when the sender has an account with an address
    pub notification: Option<EmailNotification>,
    /// Address-book entries to upsert (accepted requests from account holders only)
    pub contacts: Vec<NewContact>,
}

/// Decide the response to a contact request
///
/// `sender` is the sender's profile when the request came from an account.
pub fn plan_response(
    event: &ContactEvent,
    decision: Decision,
    recipient: &Profile,
    sender: Option<&Profile>,
    mailbox_name: &str,
    now: DateTime<Utc>,
) -> Result<ResponsePlan, IntercomError> {
    let mut updated = event.clone();
    let status = updated.respond(recipient.id, decision, now)?;

    let sender = sender.filter(|p| event.sender.profile_id() == Some(p.id));
    let sender_address = sender.and_then(|p| p.contact_email());

    let notification = sender_address.map(|to| match status {
        RequestStatus::Accepted => {
            compose_accepted(to, &recipient.full_name(), mailbox_name, &recipient.email)
        }
        _ => compose_declined(to, mailbox_name),
    });

    let contacts = match (status, sender) {
        (RequestStatus::Accepted, Some(sender)) => address_book_entries(event, recipient, sender).to_vec(),
        _ => Vec::new(),
    };

    Ok(ResponsePlan {
        event: updated,
        status,
        notification,
        contacts,
    })
}

/// Address-book entries linked by an accepted request, recipient's first
///
/// The recipient learns only what the sender disclosed; the sender learns the
/// recipient's email and the mailbox the request went through.
pub fn address_book_entries(event: &ContactEvent, recipient: &Profile, sender: &Profile) -> [NewContact; 2] {
    let disclosed = stored_disclosure(event, Some(sender));
    [
        NewContact {
            owner_id: recipient.id,
            contact_user_id: sender.id,
            mailbox_id: None,
            display_name: sender.full_name(),
            email: disclosed.email,
            phone: disclosed.phone,
        },
        NewContact {
            owner_id: sender.id,
            contact_user_id: recipient.id,
            mailbox_id: Some(event.mailbox_id),
            display_name: recipient.full_name(),
            email: recipient.contact_email().map(str::to_string),
            phone: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::intercom::contact_event::{ContactEventKind, Sender};
    use uuid::Uuid;

    fn profile(first: &str, email: &str, phone: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: "Durand".to_string(),
            phone: phone.map(str::to_string),
            email_notifications_enabled: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_from(sender: &Profile, recipient: &Profile, share_phone: bool, share_email: bool) -> ContactEvent {
        ContactEvent {
            id: Uuid::new_v4(),
            kind: ContactEventKind::Request { status: RequestStatus::Pending },
            sender: Sender::Authenticated {
                profile_id: sender.id,
                display_name: sender.full_name(),
            },
            recipient_id: recipient.id,
            mailbox_id: Uuid::new_v4(),
            message: "Bonjour".to_string(),
            share_phone,
            share_email,
            read: false,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    #[test]
    fn test_accept_puts_recipient_email_in_payload() {
        let recipient = profile("Paul", "paul@example.fr", Some("0700000000"));
        let sender = profile("Marie", "marie@example.fr", None);
        let event = pending_from(&sender, &recipient, false, false);

        let plan = plan_response(&event, Decision::Accept, &recipient, Some(&sender), "Chez Paul", Utc::now()).unwrap();
        assert_eq!(plan.status, RequestStatus::Accepted);
        let email = plan.notification.unwrap();
        assert_eq!(email.to, "marie@example.fr");
        assert!(email.html.contains("paul@example.fr"));
        assert!(email.html.contains("Paul Durand"));
        assert!(email.html.contains("Chez Paul"));
    }

    #[test]
    fn test_decline_payload_has_no_contact_detail() {
        let recipient = profile("Paul", "paul@example.fr", Some("0700000000"));
        let sender = profile("Marie", "marie@example.fr", Some("0600000000"));
        let event = pending_from(&sender, &recipient, true, true);

        let plan = plan_response(&event, Decision::Decline, &recipient, Some(&sender), "Chez Paul", Utc::now()).unwrap();
        assert_eq!(plan.status, RequestStatus::Declined);
        let html = plan.notification.unwrap().html;
        assert!(!html.contains("paul@example.fr"));
        assert!(!html.contains("0700000000"));
        assert!(!html.contains("0600000000"));
        assert!(plan.contacts.is_empty());
    }

    #[test]
    fn test_accept_seeds_both_address_books() {
        let recipient = profile("Paul", "paul@example.fr", Some("0700000000"));
        let sender = profile("Marie", "marie@example.fr", Some("0600000000"));
        let event = pending_from(&sender, &recipient, true, false);

        let plan = plan_response(&event, Decision::Accept, &recipient, Some(&sender), "Chez Paul", Utc::now()).unwrap();
        assert_eq!(plan.contacts.len(), 2);

        let for_recipient = &plan.contacts[0];
        assert_eq!(for_recipient.owner_id, recipient.id);
        assert_eq!(for_recipient.phone.as_deref(), Some("0600000000"));
        assert_eq!(for_recipient.email, None);

        let for_sender = &plan.contacts[1];
        assert_eq!(for_sender.owner_id, sender.id);
        assert_eq!(for_sender.email.as_deref(), Some("paul@example.fr"));
        assert_eq!(for_sender.phone, None);
        assert_eq!(for_sender.mailbox_id, Some(event.mailbox_id));
    }

    #[test]
    fn test_anonymous_request_accept_has_no_email_or_contacts() {
        let recipient = profile("Paul", "paul@example.fr", None);
        let mut event = pending_from(&recipient, &recipient, false, false);
        event.sender = Sender::Anonymous { display_name: "Jean".to_string() };

        let plan = plan_response(&event, Decision::Accept, &recipient, None, "Chez Paul", Utc::now()).unwrap();
        assert_eq!(plan.status, RequestStatus::Accepted);
        assert!(plan.notification.is_none());
        assert!(plan.contacts.is_empty());
    }

    #[test]
    fn test_second_response_rejected() {
        let recipient = profile("Paul", "paul@example.fr", None);
        let sender = profile("Marie", "marie@example.fr", None);
        let event = pending_from(&sender, &recipient, false, false);
        let first = plan_response(&event, Decision::Accept, &recipient, Some(&sender), "Box", Utc::now()).unwrap();

        let err = plan_response(&first.event, Decision::Decline, &recipient, Some(&sender), "Box", Utc::now()).unwrap_err();
        assert_eq!(err, IntercomError::AlreadyResponded { status: RequestStatus::Accepted });
    }
}
