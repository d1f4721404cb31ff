//! Error handling for EventDesk
//! 
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. The reconciliation core
//! never produces these errors; they originate in the persistence and
//! configuration layers around it.

use thiserror::Error;

/// Main error type for EventDesk application
#[derive(Error, Debug)]
pub enum EventDeskError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    
    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    
    #[error("Configuration error: {0}")]
    Config(String),
    
    #[error("Settings loading error: {0}")]
    Settings(#[from] config::ConfigError),
    
    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },
    
    #[error("History record not found for event: {event_id}")]
    HistoryNotFound { event_id: i64 },
    
    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: i64 },
    
    #[error("Attendee {attendee_id} is already registered for event {event_id}")]
    DuplicateRegistration { event_id: i64, attendee_id: i64 },
    
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for EventDesk operations
pub type Result<T> = std::result::Result<T, EventDeskError>;

impl EventDeskError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventDeskError::Database(_) => true,
            EventDeskError::Migration(_) => false,
            EventDeskError::Config(_) => false,
            EventDeskError::Settings(_) => false,
            EventDeskError::EventNotFound { .. } => false,
            EventDeskError::HistoryNotFound { .. } => false,
            EventDeskError::RegistrationNotFound { .. } => false,
            EventDeskError::DuplicateRegistration { .. } => false,
            EventDeskError::InvalidInput(_) => false,
            EventDeskError::Serialization(_) => false,
            EventDeskError::Io(_) => true,
            EventDeskError::UrlParse(_) => false,
        }
    }
    
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventDeskError::Database(_) => ErrorSeverity::Critical,
            EventDeskError::Migration(_) => ErrorSeverity::Critical,
            EventDeskError::Config(_) => ErrorSeverity::Critical,
            EventDeskError::Settings(_) => ErrorSeverity::Critical,
            EventDeskError::DuplicateRegistration { .. } => ErrorSeverity::Warning,
            EventDeskError::InvalidInput(_) => ErrorSeverity::Info,
            EventDeskError::EventNotFound { .. }
            | EventDeskError::HistoryNotFound { .. }
            | EventDeskError::RegistrationNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
