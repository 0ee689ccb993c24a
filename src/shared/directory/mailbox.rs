//! Mailbox Data Structure
//!
//! A mailbox is a named entry a resident publishes for one of their addresses. Its
//! visibility flags and presence decide how it is rendered in the directory and
//! whether visitors may ring it or send it a contact request.
//!
//! # Visibility
//!
//! | visible_in_directory | red_list | Directory shows | Actions |
//! |---|---|---|---|
//! | false | any | nothing | none |
//! | true | false | name + address | ring, request |
//! | true | true | name only | request |
//!
//! `do_not_disturb` removes every action regardless of the flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::directory::address::{Address, NewAddress};
use crate::shared::error::{require_text, SharedError};

/// Presence status of a mailbox owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Present,
    Absent,
    DoNotDisturb,
}

impl Default for PresenceStatus {
    fn default() -> Self {
        PresenceStatus::Present
    }
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Present => "present",
            PresenceStatus::Absent => "absent",
            PresenceStatus::DoNotDisturb => "do_not_disturb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "present" => Some(PresenceStatus::Present),
            "absent" => Some(PresenceStatus::Absent),
            "do_not_disturb" => Some(PresenceStatus::DoNotDisturb),
            _ => None,
        }
    }
}

/// Something a visitor can do with a listed mailbox
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MailboxAction {
    Ring,
    Request,
}

/// Why a mailbox refuses a visitor action
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GateRefusal {
    /// The mailbox is not published in the directory
    #[error("Mailbox not found")]
    NotListed,
    /// The owner does not want to be disturbed
    #[error("The resident does not wish to be disturbed")]
    DoNotDisturb,
    /// Red-listed mailboxes only accept contact requests
    #[error("This mailbox does not accept rings")]
    RingDisabled,
}

/// A mailbox record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mailbox {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address_id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub presence: PresenceStatus,
    pub visible_in_directory: bool,
    pub red_list: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mailbox {
    /// Flip `visible_in_directory`; `red_list` keeps its value
    pub fn toggle_visibility(&mut self) {
        self.visible_in_directory = !self.visible_in_directory;
    }

    /// Flip `red_list`; only allowed while the mailbox is listed
    pub fn toggle_red_list(&mut self) -> Result<(), SharedError> {
        if !self.visible_in_directory {
            return Err(SharedError::transition("unlisted", "red_list"));
        }
        self.red_list = !self.red_list;
        Ok(())
    }

    pub fn set_presence(&mut self, presence: PresenceStatus) {
        self.presence = presence;
    }

    /// Red list only takes effect on listed mailboxes
    pub fn is_red_listed(&self) -> bool {
        self.visible_in_directory && self.red_list
    }

    /// Actions a visitor may take, in display order
    pub fn allowed_actions(&self) -> Vec<MailboxAction> {
        [MailboxAction::Ring, MailboxAction::Request]
            .into_iter()
            .filter(|action| self.admits(*action).is_ok())
            .collect()
    }

    /// Decide whether a visitor action is accepted
    pub fn admits(&self, action: MailboxAction) -> Result<(), GateRefusal> {
        if !self.visible_in_directory {
            return Err(GateRefusal::NotListed);
        }
        if self.presence == PresenceStatus::DoNotDisturb {
            return Err(GateRefusal::DoNotDisturb);
        }
        if action == MailboxAction::Ring && self.red_list {
            return Err(GateRefusal::RingDisabled);
        }
        Ok(())
    }
}

/// Address fields shown in the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryAddress {
    pub label: String,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub postcode: String,
    pub city: String,
}

impl From<&Address> for DirectoryAddress {
    fn from(address: &Address) -> Self {
        Self {
            label: address.label.clone(),
            housenumber: address.housenumber.clone(),
            street: address.street.clone(),
            postcode: address.postcode.clone(),
            city: address.city.clone(),
        }
    }
}

/// A mailbox as a visitor sees it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryEntry {
    pub mailbox_id: Uuid,
    pub display_name: String,
    pub presence: PresenceStatus,
    pub red_list: bool,
    /// `None` for red-listed mailboxes
    pub address: Option<DirectoryAddress>,
    pub actions: Vec<MailboxAction>,
    pub created_at: DateTime<Utc>,
}

impl DirectoryEntry {
    /// Render a mailbox for visitors, suppressing what the red list hides
    pub fn render(mailbox: &Mailbox, address: &Address) -> Self {
        let red_listed = mailbox.is_red_listed();
        Self {
            mailbox_id: mailbox.id,
            display_name: mailbox.display_name.clone(),
            presence: mailbox.presence,
            red_list: red_listed,
            address: (!red_listed).then(|| DirectoryAddress::from(address)),
            actions: mailbox.allowed_actions(),
            created_at: mailbox.created_at,
        }
    }
}

/// Mailbox together with its full address, for its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnedMailbox {
    #[serde(flatten)]
    pub mailbox: Mailbox,
    pub address: Address,
}

/// Request to create a mailbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMailboxRequest {
    pub display_name: String,
    pub address: NewAddress,
    #[serde(default = "default_visible")]
    pub visible_in_directory: bool,
    #[serde(default)]
    pub red_list: bool,
    #[serde(default)]
    pub presence: PresenceStatus,
}

fn default_visible() -> bool {
    true
}

impl CreateMailboxRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("display_name", &self.display_name)?;
        self.address.validate()?;
        if self.red_list && !self.visible_in_directory {
            return Err(SharedError::validation(
                "red_list",
                "Only a mailbox listed in the directory can be red-listed",
            ));
        }
        Ok(())
    }
}

/// Request to change presence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPresenceRequest {
    pub presence: PresenceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailbox(visible: bool, red_list: bool, presence: PresenceStatus) -> Mailbox {
        Mailbox {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            address_id: Uuid::new_v4(),
            display_name: "Famille Martin".to_string(),
            presence,
            visible_in_directory: visible,
            red_list,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn address() -> Address {
        Address {
            id: Uuid::new_v4(),
            ban_id: "75104_8200_00008".to_string(),
            label: "8 Rue de Rivoli 75004 Paris".to_string(),
            housenumber: Some("8".to_string()),
            street: Some("Rue de Rivoli".to_string()),
            postcode: "75004".to_string(),
            city: "Paris".to_string(),
            citycode: Some("75104".to_string()),
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_presence_round_trip_names() {
        for presence in [PresenceStatus::Present, PresenceStatus::Absent, PresenceStatus::DoNotDisturb] {
            assert_eq!(PresenceStatus::from_str(presence.as_str()), Some(presence));
        }
        assert_eq!(PresenceStatus::from_str("busy"), None);
    }

    #[test]
    fn test_listed_mailbox_shows_address_and_both_actions() {
        let entry = DirectoryEntry::render(&mailbox(true, false, PresenceStatus::Present), &address());
        assert!(entry.address.is_some());
        assert_eq!(entry.actions, vec![MailboxAction::Ring, MailboxAction::Request]);
    }

    #[test]
    fn test_red_list_hides_address_and_ring_but_keeps_listing() {
        let mut mb = mailbox(true, false, PresenceStatus::Present);
        mb.toggle_red_list().unwrap();
        assert!(mb.visible_in_directory);

        let entry = DirectoryEntry::render(&mb, &address());
        assert_eq!(entry.display_name, "Famille Martin");
        assert!(entry.address.is_none());
        assert_eq!(entry.actions, vec![MailboxAction::Request]);
    }

    #[test]
    fn test_do_not_disturb_has_no_action() {
        let mb = mailbox(true, false, PresenceStatus::DoNotDisturb);
        assert!(mb.allowed_actions().is_empty());
        assert_eq!(mb.admits(MailboxAction::Request), Err(GateRefusal::DoNotDisturb));
    }

    #[test]
    fn test_unlisted_mailbox_refuses_everything() {
        let mb = mailbox(false, false, PresenceStatus::Present);
        assert_eq!(mb.admits(MailboxAction::Ring), Err(GateRefusal::NotListed));
        assert_eq!(mb.admits(MailboxAction::Request), Err(GateRefusal::NotListed));
    }

    #[test]
    fn test_red_list_toggle_requires_visibility() {
        let mut mb = mailbox(false, false, PresenceStatus::Present);
        assert!(matches!(mb.toggle_red_list(), Err(SharedError::TransitionError { .. })));
        assert!(!mb.red_list);
    }

    #[test]
    fn test_visibility_toggle_preserves_red_list() {
        let mut mb = mailbox(true, true, PresenceStatus::Present);
        mb.toggle_visibility();
        assert!(!mb.visible_in_directory);
        assert!(mb.red_list);
        assert!(!mb.is_red_listed());
        mb.toggle_visibility();
        assert!(mb.is_red_listed());
    }

    #[test]
    fn test_create_request_defaults() {
        let json = serde_json::json!({
            "display_name": "Chez Paul",
            "address": { "ban_id": "x", "label": "1 Place", "postcode": "69001", "city": "Lyon" }
        });
        let request: CreateMailboxRequest = serde_json::from_value(json).unwrap();
        assert!(request.visible_in_directory);
        assert!(!request.red_list);
        assert_eq!(request.presence, PresenceStatus::Present);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_unlisted_red_list() {
        let json = serde_json::json!({
            "display_name": "Chez Paul",
            "visible_in_directory": false,
            "red_list": true,
            "address": { "ban_id": "x", "label": "1 Place", "postcode": "69001", "city": "Lyon" }
        });
        let request: CreateMailboxRequest = serde_json::from_value(json).unwrap();
        assert!(request.validate().unwrap_err().is_validation());
    }
}
