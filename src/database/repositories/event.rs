//! Event repository implementation

use std::time::Instant;

use sqlx::{PgPool, Postgres, Transaction};
use sqlx::types::Json;
use chrono::Utc;
use serde_json::Value;
use crate::models::event::{Event, CreateEventRequest, UpdateEventRequest};
use crate::utils::errors::EventDeskError;
use crate::utils::helpers::elapsed_ms;
use crate::utils::logging::log_database_operation;

const EVENT_COLUMNS: &str = "id, title, description, event_date, location, max_participants, required_documents, media_links, created_by, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event with already canonical document and media fields
    pub async fn create(
        &self,
        request: &CreateEventRequest,
        required_documents: Value,
        media_links: Value,
    ) -> Result<Event, EventDeskError> {
        let started = Instant::now();
        let now = Utc::now();
        let result = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, event_date, location, max_participants, required_documents, media_links, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(&request.location)
        .bind(request.max_participants)
        .bind(Json(required_documents))
        .bind(Json(media_links))
        .bind(request.created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        log_database_operation("insert", "events", elapsed_ms(started), result.is_ok());
        Ok(result?)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventDeskError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID and lock its row until the transaction ends
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<Event>, EventDeskError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(event)
    }

    /// Update event inside a transaction holding the row lock.
    ///
    /// `required_documents` of `None` leaves the stored checklist untouched;
    /// `media_links` is always rewritten with the merged gallery.
    pub async fn update_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        request: &UpdateEventRequest,
        required_documents: Option<Value>,
        media_links: Value,
    ) -> Result<Event, EventDeskError> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                location = COALESCE($5, location),
                max_participants = COALESCE($6, max_participants),
                is_active = COALESCE($7, is_active),
                required_documents = COALESCE($8, required_documents),
                media_links = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(&request.location)
        .bind(request.max_participants)
        .bind(request.is_active)
        .bind(required_documents.map(Json))
        .bind(Json(media_links))
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await;

        log_database_operation("update", "events", elapsed_ms(started), result.is_ok());
        Ok(result?)
    }

    /// Overwrite the document and media fields without touching anything else
    pub async fn set_reconciled_fields(
        &self,
        id: i64,
        required_documents: Value,
        media_links: Value,
    ) -> Result<(), EventDeskError> {
        let started = Instant::now();
        let result = sqlx::query("UPDATE events SET required_documents = $2, media_links = $3 WHERE id = $1")
            .bind(id)
            .bind(Json(required_documents))
            .bind(Json(media_links))
            .execute(&self.pool)
            .await;

        log_database_operation("normalize_fields", "events", elapsed_ms(started), result.is_ok());
        result?;
        Ok(())
    }

    /// List events with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>, EventDeskError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
