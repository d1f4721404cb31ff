//! Event history model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

use super::media::UploadDescriptor;

/// Post-event record: summary, free-form stats and its own media area
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventHistory {
    pub id: i64,
    pub event_id: i64,
    pub summary: Option<String>,
    pub stats: Option<Value>,
    pub media_links: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHistoryRequest {
    pub event_id: i64,
    pub summary: Option<String>,
    pub stats: Option<Value>,
    #[serde(default)]
    pub media_uploads: Vec<UploadDescriptor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHistoryRequest {
    pub summary: Option<String>,
    pub stats: Option<Value>,
    #[serde(default)]
    pub keep_media: Option<Value>,
    #[serde(default)]
    pub media_uploads: Vec<UploadDescriptor>,
}
