//! Services module
//!
//! Thin adapters between stored rows and the reconciliation layer

pub mod event;
pub mod history;
pub mod links;
pub mod normalizer;
pub mod registration;

// Re-export commonly used services
pub use event::{EventService, EventUpdatePlan};
pub use history::HistoryService;
pub use links::{MediaLinkResolver, ResolvedMediaItem};
pub use normalizer::{FieldRewrite, NormalizerService, NormalizationReport};
pub use registration::RegistrationService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub history_service: HistoryService,
    pub registration_service: RegistrationService,
    pub normalizer: NormalizerService,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: &Settings) -> Result<Self> {
        let links = MediaLinkResolver::new(&settings.storage)?;

        Ok(Self {
            event_service: EventService::new(database.clone(), links.clone()),
            history_service: HistoryService::new(database.clone(), links),
            registration_service: RegistrationService::new(database.clone()),
            normalizer: NormalizerService::new(database.clone(), settings.normalizer.clone()),
            database,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = self.database.health_check().await.is_ok();

        ServiceHealthStatus { database_healthy }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }

        issues
    }
}
