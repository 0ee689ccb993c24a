//! Real-time Update Module
//!
//! Pushes change triggers to connected clients over Server-Sent Events.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Event broadcasting utilities
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! # Event Types
//!
//! - `ring` - a visitor rang one of the caller's mailboxes
//! - `contact_request` - a new request arrived
//! - `request_status` - one of the caller's requests was answered
//! - `message` - a direct message arrived
//!
//! Each event carries its `recipient_id`; a subscriber only ever sees its own.

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

// Re-export commonly used types and functions
pub use broadcast::{broadcast_event, realtime_channel, RealtimeEventBroadcast};
pub use subscription::handle_realtime_subscription;
