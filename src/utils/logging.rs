//! Logging configuration and setup
//! 
//! This module provides logging initialization and structured logging utilities
//! for the EventDesk application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();
        
    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        details = details,
        "Event action performed"
    );
}

/// Log the outcome of a gallery merge
pub fn log_gallery_merge(event_id: i64, retained: usize, appended: usize, total: usize) {
    info!(
        event_id = event_id,
        retained = retained,
        appended = appended,
        total = total,
        "Gallery merged"
    );
}

/// Log a registrant's document upload
pub fn log_document_upload(registration_id: i64, document: &str, stored_name: &str, required: bool) {
    if required {
        info!(
            registration_id = registration_id,
            document = document,
            stored_name = stored_name,
            "Required document uploaded"
        );
    } else {
        warn!(
            registration_id = registration_id,
            document = document,
            stored_name = stored_name,
            "Uploaded document is not on the event checklist"
        );
    }
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
