//! Ring and contact-request submission.
//!
//! [`plan_submission`] decides everything about a new contact event without touching
//! storage: who the sender is, what they effectively disclose, whether the mailbox
//! admits the action, and which email (if any) the recipient gets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::directory::mailbox::{Mailbox, MailboxAction};
use crate::shared::directory::profile::{non_empty, Profile};
use crate::shared::error::{require_text, SharedError};
use crate::shared::intercom::contact_event::{
    ContactEvent, ContactEventKind, RequestStatus, Sender,
};
use crate::shared::intercom::notification::{compose_request, compose_ring, EmailNotification};
use crate::shared::intercom::IntercomError;

/// Body of a ring or contact-request submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionInput {
    pub message: String,
    /// Required for anonymous senders, ignored for authenticated ones
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub share_phone: bool,
    #[serde(default)]
    pub share_email: bool,
}

impl SubmissionInput {
    /// Input checks that need no I/O
    pub fn validate(&self, authenticated: bool) -> Result<(), SharedError> {
        require_text("message", &self.message)?;
        if !authenticated {
            require_text("sender_name", self.sender_name.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Contact details a sender actually discloses
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Disclosure {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Disclosure {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none()
    }
}

/// A detail is disclosed only when the sender is authenticated, asked to share it,
/// and actually has a non-empty value on file
pub fn effective_disclosure(sender: Option<&Profile>, share_phone: bool, share_email: bool) -> Disclosure {
    match sender {
        None => Disclosure::default(),
        Some(profile) => Disclosure {
            phone: profile.contact_phone().filter(|_| share_phone).map(str::to_string),
            email: profile.contact_email().filter(|_| share_email).map(str::to_string),
        },
    }
}

/// Disclosure recorded on a stored event, re-read against the sender's profile
pub fn stored_disclosure(event: &ContactEvent, sender: Option<&Profile>) -> Disclosure {
    let sender = sender.filter(|p| event.sender.profile_id() == Some(p.id));
    effective_disclosure(sender, event.share_phone, event.share_email)
}

/// Authenticated senders are named after their profile; a supplied name is ignored
pub fn resolve_sender(sender: Option<&Profile>, supplied_name: Option<&str>) -> Result<Sender, SharedError> {
    match sender {
        Some(profile) => Ok(Sender::Authenticated {
            profile_id: profile.id,
            display_name: profile.full_name(),
        }),
        None => {
            let name = non_empty(supplied_name)
                .ok_or_else(|| SharedError::validation("sender_name", "sender_name is required"))?;
            Ok(Sender::Anonymous {
                display_name: name.to_string(),
            })
        }
    }
}

/// Outcome of a successful submission plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub event: ContactEvent,
    pub disclosure: Disclosure,
    /// Email for the recipient, when they have an address and accept notifications
    pub notification: Option<EmailNotification>,
}

/// Decide a ring or contact request against a mailbox
pub fn plan_submission(
    action: MailboxAction,
    input: &SubmissionInput,
    sender: Option<&Profile>,
    mailbox: &Mailbox,
    recipient: &Profile,
    now: DateTime<Utc>,
) -> Result<SubmissionPlan, IntercomError> {
    input.validate(sender.is_some())?;
    mailbox.admits(action)?;
    if sender.is_some_and(|s| s.id == mailbox.owner_id) {
        return Err(SharedError::validation("mailbox_id", "You cannot contact your own mailbox").into());
    }

    let resolved = resolve_sender(sender, input.sender_name.as_deref())?;
    let disclosure = effective_disclosure(sender, input.share_phone, input.share_email);
    let message = input.message.trim().to_string();

    let kind = match action {
        MailboxAction::Ring => ContactEventKind::Ring,
        MailboxAction::Request => ContactEventKind::Request {
            status: RequestStatus::Pending,
        },
    };

    let event = ContactEvent {
        id: Uuid::new_v4(),
        kind,
        sender: resolved,
        recipient_id: mailbox.owner_id,
        mailbox_id: mailbox.id,
        message,
        share_phone: disclosure.phone.is_some(),
        share_email: disclosure.email.is_some(),
        read: false,
        created_at: now,
        responded_at: None,
    };

    let notification = recipient.notification_address().map(|to| {
        let compose = match action {
            MailboxAction::Ring => compose_ring,
            MailboxAction::Request => compose_request,
        };
        compose(
            to,
            event.sender.display_name(),
            &mailbox.display_name,
            &event.message,
            &disclosure,
        )
    });

    Ok(SubmissionPlan {
        event,
        disclosure,
        notification,
    })
}
