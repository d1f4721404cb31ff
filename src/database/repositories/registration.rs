//! Registration repository implementation

use std::time::Instant;

use sqlx::{PgPool, Postgres, Transaction};
use sqlx::types::Json;
use chrono::Utc;
use serde_json::Value;
use crate::models::registration::{Registration, RegisterRequest};
use crate::utils::errors::EventDeskError;
use crate::utils::helpers::elapsed_ms;
use crate::utils::logging::log_database_operation;

const REGISTRATION_COLUMNS: &str = "id, event_id, attendee_id, attendee_name, attendee_email, documents, status, registered_at, updated_at";

/// Status written for new registrations
const REGISTERED: &str = "registered";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register an attendee with an empty document set.
    ///
    /// Losing a race against another registration for the same attendee
    /// surfaces as `DuplicateRegistration`.
    pub async fn create(&self, request: &RegisterRequest) -> Result<Registration, EventDeskError> {
        let started = Instant::now();
        let now = Utc::now();
        let result = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (event_id, attendee_id, attendee_name, attendee_email, documents, status, registered_at, updated_at)
            VALUES ($1, $2, $3, $4, '{{}}'::jsonb, $5, $6, $7)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(request.event_id)
        .bind(request.attendee_id)
        .bind(&request.attendee_name)
        .bind(&request.attendee_email)
        .bind(REGISTERED)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        log_database_operation("insert", "registrations", elapsed_ms(started), result.is_ok());
        result.map_err(|e| insert_error(e, request))
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, EventDeskError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find registration by ID and lock it until the transaction ends
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<Registration>, EventDeskError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(registration)
    }

    /// Check if an attendee is registered for an event
    pub async fn is_registered(&self, event_id: i64, attendee_id: i64) -> Result<bool, EventDeskError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND attendee_id = $2"
        )
        .bind(event_id)
        .bind(attendee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Replace the uploaded-documents field of a locked registration
    pub async fn set_documents_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        documents: Value,
    ) -> Result<Registration, EventDeskError> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations
            SET documents = $2, updated_at = $3
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(documents))
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await;

        log_database_operation("update_documents", "registrations", elapsed_ms(started), result.is_ok());
        Ok(result?)
    }

    /// Overwrite the documents field without touching anything else
    pub async fn set_documents(&self, id: i64, documents: Value) -> Result<(), EventDeskError> {
        let started = Instant::now();
        let result = sqlx::query("UPDATE registrations SET documents = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(documents))
            .execute(&self.pool)
            .await;

        log_database_operation("normalize_documents", "registrations", elapsed_ms(started), result.is_ok());
        result?;
        Ok(())
    }

    /// List registrations with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Registration>, EventDeskError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }
}

fn insert_error(err: sqlx::Error, request: &RegisterRequest) -> EventDeskError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => EventDeskError::DuplicateRegistration {
            event_id: request.event_id,
            attendee_id: request.attendee_id,
        },
        _ => EventDeskError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct ConstraintViolation {
        unique: bool,
    }

    impl fmt::Display for ConstraintViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl StdError for ConstraintViolation {}

    impl DatabaseError for ConstraintViolation {
        fn message(&self) -> &str {
            "constraint violated on registrations"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::ForeignKeyViolation
            }
        }
    }

    fn request() -> RegisterRequest {
        RegisterRequest {
            event_id: 4,
            attendee_id: 21,
            attendee_name: "Ravi".to_string(),
            attendee_email: None,
        }
    }

    #[test]
    fn test_unique_violation_becomes_duplicate_registration() {
        let err = sqlx::Error::Database(Box::new(ConstraintViolation { unique: true }));
        assert_matches!(
            insert_error(err, &request()),
            EventDeskError::DuplicateRegistration { event_id: 4, attendee_id: 21 }
        );
    }

    #[test]
    fn test_other_insert_errors_stay_database_errors() {
        let err = sqlx::Error::Database(Box::new(ConstraintViolation { unique: false }));
        assert_matches!(insert_error(err, &request()), EventDeskError::Database(_));
        assert_matches!(insert_error(sqlx::Error::RowNotFound, &request()), EventDeskError::Database(_));
    }
}
