//! Event history repository implementation

use std::time::Instant;

use sqlx::{PgPool, Postgres, Transaction};
use sqlx::types::Json;
use chrono::Utc;
use serde_json::Value;
use crate::models::history::{EventHistory, CreateHistoryRequest, UpdateHistoryRequest};
use crate::utils::errors::EventDeskError;
use crate::utils::helpers::elapsed_ms;
use crate::utils::logging::log_database_operation;

const HISTORY_COLUMNS: &str = "id, event_id, summary, stats, media_links, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the history record of an event
    pub async fn create(&self, request: &CreateHistoryRequest, media_links: Value) -> Result<EventHistory, EventDeskError> {
        let started = Instant::now();
        let now = Utc::now();
        let result = sqlx::query_as::<_, EventHistory>(&format!(
            r#"
            INSERT INTO event_histories (event_id, summary, stats, media_links, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(request.event_id)
        .bind(&request.summary)
        .bind(request.stats.clone().map(Json))
        .bind(Json(media_links))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        log_database_operation("insert", "event_histories", elapsed_ms(started), result.is_ok());
        Ok(result?)
    }

    /// Find the history record of an event
    pub async fn find_by_event_id(&self, event_id: i64) -> Result<Option<EventHistory>, EventDeskError> {
        let history = sqlx::query_as::<_, EventHistory>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM event_histories WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(history)
    }

    /// Find the history record of an event and lock it until the transaction ends
    pub async fn find_by_event_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<Option<EventHistory>, EventDeskError> {
        let history = sqlx::query_as::<_, EventHistory>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM event_histories WHERE event_id = $1 FOR UPDATE"
        ))
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(history)
    }

    /// Update a locked history record with its merged gallery
    pub async fn update_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        request: &UpdateHistoryRequest,
        media_links: Value,
    ) -> Result<EventHistory, EventDeskError> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, EventHistory>(&format!(
            r#"
            UPDATE event_histories
            SET summary = COALESCE($2, summary),
                stats = COALESCE($3, stats),
                media_links = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.summary)
        .bind(request.stats.clone().map(Json))
        .bind(Json(media_links))
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await;

        log_database_operation("update", "event_histories", elapsed_ms(started), result.is_ok());
        Ok(result?)
    }

    /// Overwrite the media field without touching anything else
    pub async fn set_media_links(&self, id: i64, media_links: Value) -> Result<(), EventDeskError> {
        let started = Instant::now();
        let result = sqlx::query("UPDATE event_histories SET media_links = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(media_links))
            .execute(&self.pool)
            .await;

        log_database_operation("normalize_media", "event_histories", elapsed_ms(started), result.is_ok());
        result?;
        Ok(())
    }

    /// List history records with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<EventHistory>, EventDeskError> {
        let histories = sqlx::query_as::<_, EventHistory>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM event_histories ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(histories)
    }
}
