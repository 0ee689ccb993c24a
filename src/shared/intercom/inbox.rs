//! Inbox read model and list views.
//!
//! Clients keep a local copy of their rings and requests. [`Inbox::apply`] takes the
//! event returned by a successful response and replaces the stale copy, so the
//! local list only ever reflects states the server has confirmed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::directory::profile::Profile;
use crate::shared::intercom::contact_event::{ContactEvent, RequestStatus};
use crate::shared::intercom::submission::stored_disclosure;

/// Counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardCounts {
    pub unread_rings: i64,
    pub pending_requests: i64,
}

/// Locally held list of received events, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbox {
    events: Vec<ContactEvent>,
}

impl Inbox {
    pub fn new(mut events: Vec<ContactEvent>) -> Self {
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { events }
    }

    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    pub fn get(&self, id: Uuid) -> Option<&ContactEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Add an event announced by the realtime feed; duplicates are ignored
    pub fn insert(&mut self, event: ContactEvent) -> bool {
        if self.get(event.id).is_some() {
            return false;
        }
        let position = self
            .events
            .iter()
            .position(|e| e.created_at <= event.created_at)
            .unwrap_or(self.events.len());
        self.events.insert(position, event);
        true
    }

    /// Replace an event with the server-confirmed version
    pub fn apply(&mut self, confirmed: ContactEvent) -> bool {
        match self.events.iter_mut().find(|e| e.id == confirmed.id) {
            Some(slot) => {
                *slot = confirmed;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ContactEvent> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    pub fn pending_requests(&self) -> impl Iterator<Item = &ContactEvent> {
        self.events.iter().filter(|e| e.is_pending())
    }

    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            unread_rings: self.events.iter().filter(|e| e.is_ring() && !e.read).count() as i64,
            pending_requests: self.pending_requests().count() as i64,
        }
    }
}

/// An event with the names and details its viewer is allowed to see
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventView {
    #[serde(flatten)]
    pub event: ContactEvent,
    pub mailbox_name: String,
    pub counterpart_name: String,
    pub counterpart_email: Option<String>,
    pub counterpart_phone: Option<String>,
}

impl EventView {
    /// View for the recipient: sender details only as disclosed
    pub fn received(event: ContactEvent, mailbox_name: String, sender: Option<&Profile>) -> Self {
        let disclosed = stored_disclosure(&event, sender);
        Self {
            counterpart_name: event.sender.display_name().to_string(),
            counterpart_email: disclosed.email,
            counterpart_phone: disclosed.phone,
            mailbox_name,
            event,
        }
    }

    /// View for the sender: the recipient is revealed once the request is accepted
    pub fn sent(event: ContactEvent, mailbox_name: String, recipient: &Profile) -> Self {
        let accepted = event.status() == Some(RequestStatus::Accepted);
        Self {
            counterpart_name: if accepted { recipient.full_name() } else { mailbox_name.clone() },
            counterpart_email: if accepted { recipient.contact_email().map(str::to_string) } else { None },
            counterpart_phone: None,
            mailbox_name,
            event,
        }
    }
}
