//! Registration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub attendee_id: i64,
    pub attendee_name: String,
    pub attendee_email: Option<String>,
    pub documents: Option<Value>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub event_id: i64,
    pub attendee_id: i64,
    pub attendee_name: String,
    pub attendee_email: Option<String>,
}

/// One stored document file for a registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadRequest {
    pub document_name: String,
    pub stored_name: String,
}
