//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

use super::media::UploadDescriptor;

/// Event row. `required_documents` and `media_links` hold whatever shape was
/// stored for them and are only read through the reconciliation layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub required_documents: Option<Value>,
    pub media_links: Option<Value>,
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub created_by: Option<i64>,
    #[serde(default)]
    pub required_documents: Option<Value>,
    #[serde(default)]
    pub media_uploads: Vec<UploadDescriptor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
    /// Replacement checklist; absent leaves the stored one untouched
    #[serde(default)]
    pub required_documents: Option<Value>,
    /// Urls of existing media to retain; absent retains all of them
    #[serde(default)]
    pub keep_media: Option<Value>,
    #[serde(default)]
    pub media_uploads: Vec<UploadDescriptor>,
}
