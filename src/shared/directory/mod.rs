//! Directory Module
//!
//! - `Profile` - a registered user
//! - `Address` - a geocoded postal address, shared between mailboxes
//! - `Mailbox` - a published entry with visibility flags and presence
//! - `DirectoryEntry` - a mailbox rendered for visitors
//!
//! # Usage
//!
//! ```rust
//! use interphone::shared::directory::{Mailbox, DirectoryEntry, PresenceStatus};
//! ```

pub mod address;
pub mod mailbox;
pub mod profile;
pub mod search;

pub use address::{Address, GeocodeCandidate, NewAddress};
pub use mailbox::{
    CreateMailboxRequest, DirectoryAddress, DirectoryEntry, GateRefusal, Mailbox,
    MailboxAction, OwnedMailbox, PresenceStatus, SetPresenceRequest,
};
pub use profile::{Profile, ProfileUpdate};
