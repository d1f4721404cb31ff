//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod history;
pub mod registration;
pub mod media;
pub mod documents;

// Re-export commonly used models
pub use event::{Event, CreateEventRequest, UpdateEventRequest};
pub use history::{EventHistory, CreateHistoryRequest, UpdateHistoryRequest};
pub use registration::{Registration, RegisterRequest, DocumentUploadRequest};
pub use media::{MediaKind, MediaItem, Provenance, SourcedMediaItem, UploadDescriptor};
pub use documents::{RequiredDocumentList, UploadedDocument, UploadedDocumentSet, ComplianceView};
