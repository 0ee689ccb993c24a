//! Contact Data Structure
//!
//! An address-book entry one user keeps for another. Entries are seeded when a
//! contact request is accepted and can then be annotated or removed by their owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An address-book entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Unique contact ID
    pub id: Uuid,
    /// The user who owns this contact entry
    pub owner_id: Uuid,
    /// The user this entry points at
    pub contact_user_id: Uuid,
    /// Mailbox through which the contact was made, if any
    pub mailbox_id: Option<Uuid>,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Case-insensitive match on name or email
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.display_name.to_lowercase().contains(&query)
            || self
                .email
                .as_deref()
                .map(|email| email.to_lowercase().contains(&query))
                .unwrap_or(false)
    }
}

/// Fields for creating (or refreshing) an address-book entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContact {
    pub owner_id: Uuid,
    pub contact_user_id: Uuid,
    pub mailbox_id: Option<Uuid>,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Request body for adding a contact by hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddContactRequest {
    pub contact_user_id: Uuid,
}

/// Request body for editing notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateContactRequest {
    /// Blank notes clear the field
    pub fn normalized_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

/// Response type for listing contacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContactsResponse {
    pub contacts: Vec<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: Option<&str>) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            contact_user_id: Uuid::new_v4(),
            mailbox_id: None,
            display_name: name.to_string(),
            email: email.map(str::to_string),
            phone: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_name_and_email() {
        let c = contact("Marie Curie", Some("marie@Example.fr"));
        assert!(c.matches("curie"));
        assert!(c.matches("EXAMPLE"));
        assert!(c.matches("  "));
        assert!(!c.matches("paul"));
    }

    #[test]
    fn test_matches_without_email() {
        assert!(!contact("Jean", None).matches("example"));
    }

    #[test]
    fn test_blank_notes_clear() {
        let request = UpdateContactRequest { notes: Some("   ".to_string()) };
        assert_eq!(request.normalized_notes(), None);
        let request = UpdateContactRequest { notes: Some(" voisin du 3e ".to_string()) };
        assert_eq!(request.normalized_notes().as_deref(), Some("voisin du 3e"));
    }
}
