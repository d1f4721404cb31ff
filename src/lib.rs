//! EventDesk
//!
//! Backend library for an event-management application: organizers publish
//! events with a document checklist, attendees register and upload their
//! documents, and past events keep a history record with its own media.
//! The `reconcile` module holds the pure normalization logic for checklists
//! and galleries; everything else adapts stored rows to it.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod reconcile;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventDeskError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
