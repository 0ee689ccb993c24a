//! Messaging Module
//!
//! - `Contact` - an address-book entry
//! - `DirectMessage` - a message between two contacts
//!
//! # Usage
//!
//! ```rust
//! use interphone::shared::messaging::{Contact, DirectMessage};
//! ```

pub mod contact;
pub mod message;

pub use contact::{AddContactRequest, Contact, ListContactsResponse, NewContact, UpdateContactRequest};
pub use message::{DirectMessage, ListMessagesResponse, SendMessageRequest};
