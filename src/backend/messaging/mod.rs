//! Messaging Module
//!
//! Address-book contacts and direct messages.
//!
//! - `GET|POST /api/contacts`, `PATCH|DELETE /api/contacts/{id}`
//! - `GET|POST /api/messages/{contact_user_id}`

pub mod db;
pub mod handlers;

pub use handlers::{add_contact, delete_contact, get_messages, list_contacts, send_message, update_contact};
