//! Configuration validation module
//! 
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EventDeskError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    validate_normalizer_config(&settings.normalizer)?;
    
    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventDeskError::Config(
            "Database URL is required".to_string()
        ));
    }
    
    if config.max_connections == 0 {
        return Err(EventDeskError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }
    
    if config.min_connections > config.max_connections {
        return Err(EventDeskError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }
    
    if config.acquire_timeout_seconds == 0 {
        return Err(EventDeskError::Config(
            "Acquire timeout must be greater than 0".to_string()
        ));
    }
    
    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    let base = url::Url::parse(&config.base_url).map_err(|e| {
        EventDeskError::Config(format!("Invalid storage base URL {}: {}", config.base_url, e))
    })?;
    
    if base.cannot_be_a_base() {
        return Err(EventDeskError::Config(
            format!("Storage base URL cannot be used as a base: {}", config.base_url)
        ));
    }
    
    for (name, path) in [
        ("events_path", &config.events_path),
        ("history_path", &config.history_path),
        ("documents_path", &config.documents_path),
    ] {
        if path.trim_matches('/').is_empty() {
            return Err(EventDeskError::Config(
                format!("Storage {} is required", name)
            ));
        }
    }
    
    if config.events_path.trim_matches('/') == config.history_path.trim_matches('/') {
        return Err(EventDeskError::Config(
            "Event and history media must use different storage paths".to_string()
        ));
    }
    
    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventDeskError::Config(
            "Log level is required".to_string()
        ));
    }
    
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventDeskError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }
    
    if config.file_name.is_empty() {
        return Err(EventDeskError::Config(
            "Log file name is required".to_string()
        ));
    }
    
    Ok(())
}

/// Validate normalization sweep configuration
fn validate_normalizer_config(config: &super::NormalizerConfig) -> Result<()> {
    if config.batch_size == 0 {
        return Err(EventDeskError::Config(
            "Normalizer batch size must be greater than 0".to_string()
        ));
    }
    
    Ok(())
}
