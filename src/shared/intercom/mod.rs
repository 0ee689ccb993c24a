//! Intercom Module
//!
//! The ring / contact-request state machine:
//!
//! - `ContactEvent` - one record type for rings and requests
//! - `plan_submission` - decide a new ring or request against a mailbox
//! - `plan_response` - decide the accept/decline of a pending request
//! - `EmailNotification` - payloads for the notification dispatcher
//! - `Inbox` - client read model updated from confirmed responses
//!
//! ```text
//!             submit(request)           respond(accept)
//!   (none) ──────────────────► pending ─────────────────► accepted
//!                                  │
//!                                  └──────────────────────► declined
//!                                     respond(decline)
//! ```
//!
//! Rings have no status; they are terminal on creation.

use thiserror::Error;

use crate::shared::directory::mailbox::GateRefusal;
use crate::shared::error::SharedError;

pub mod contact_event;
pub mod inbox;
pub mod notification;
pub mod response;
pub mod submission;

pub use contact_event::{ContactEvent, ContactEventKind, Decision, RequestStatus, Sender};
pub use inbox::{DashboardCounts, EventView, Inbox};
pub use notification::{html_escape, EmailKind, EmailNotification};
pub use response::{address_book_entries, plan_response, ResponsePlan};
pub use submission::{effective_disclosure, plan_submission, Disclosure, SubmissionInput, SubmissionPlan};

/// Reasons the intercom state machine refuses an operation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntercomError {
    /// Malformed input
    #[error(transparent)]
    Invalid(#[from] SharedError),

    /// The mailbox does not admit the action
    #[error(transparent)]
    Refused(#[from] GateRefusal),

    /// Caller is not the recipient of the request
    #[error("Only the recipient can respond to this request")]
    Forbidden,

    /// The event is a ring, which has no response
    #[error("Contact request not found")]
    NotARequest,

    /// The request already reached a terminal status
    #[error("This request has already been {}", .status.as_str())]
    AlreadyResponded {
        status: contact_event::RequestStatus,
    },
}
