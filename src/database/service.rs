//! Database service layer
//! 
//! This module bundles the repositories over one shared pool

use sqlx::{Postgres, Transaction};
use crate::database::{DatabasePool, EventRepository, HistoryRepository, RegistrationRepository};
use crate::utils::errors::EventDeskError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub events: EventRepository,
    pub histories: HistoryRepository,
    pub registrations: RegistrationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            histories: HistoryRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Start a transaction for a locked read-modify-write cycle
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, EventDeskError> {
        Ok(self.pool.begin().await?)
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), EventDeskError> {
        super::connection::health_check(&self.pool).await
    }
}
