//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Database test fixtures (only active when `DATABASE_URL` is set)
//! - Router helpers for driving the app without a network listener
//! - Authentication test helpers
//! - Custom assertion macros

#![allow(dead_code)]

pub mod app;
pub mod assertions;
pub mod auth_helpers;
pub mod database;

// Re-export commonly used utilities
pub use app::*;
pub use auth_helpers::*;
pub use database::*;
