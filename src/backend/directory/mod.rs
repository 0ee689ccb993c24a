//! Directory Module
//!
//! Mailboxes, their addresses and the public directory.
//!
//! - `GET /api/directory?q=` - search listed mailboxes
//! - `GET|POST /api/mailboxes` - the caller's mailboxes
//! - `GET|DELETE /api/mailboxes/{id}` - public view, deletion
//! - `POST /api/mailboxes/{id}/visibility`, `POST /api/mailboxes/{id}/red-list`,
//!   `PUT /api/mailboxes/{id}/presence`
//!
//! State transitions are decided by `shared::directory::Mailbox`; this module loads
//! and saves rows around them.

pub mod db;
pub mod handlers;

pub use handlers::{
    create_mailbox, delete_mailbox, get_public_mailbox, list_my_mailboxes, search_directory, set_presence,
    toggle_red_list, toggle_visibility,
};
