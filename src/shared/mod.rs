//! Shared Module
//!
//! This module contains the domain types and the pure logic of the service. Nothing
//! here performs I/O: the backend loads rows, hands them to these functions to decide
//! what happens, and persists the outcome.
//!
//! # Overview
//!
//! - `directory` - profiles, addresses, mailboxes and directory search
//! - `intercom` - rings, contact requests, disclosure and email composition
//! - `messaging` - address-book contacts and direct messages
//! - `event` - realtime feed events
//! - `config` - application configuration

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Profiles, addresses, mailboxes and the directory
pub mod directory;

/// Rings, contact requests and their notifications
pub mod intercom;

/// Contacts and direct messages
pub mod messaging;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{EventType, RealtimeEvent};
