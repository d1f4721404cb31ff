//! Event history service implementation

use serde_json::Value;
use tracing::debug;

use crate::database::DatabaseService;
use crate::models::history::{EventHistory, CreateHistoryRequest, UpdateHistoryRequest};
use crate::models::media::Provenance;
use crate::reconcile::{gallery_to_value, merge_gallery_detailed, parse_keep_list, GalleryMerge};
use crate::services::links::MediaLinkResolver;
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::logging::{log_event_action, log_gallery_merge};

/// Merge a history update into the record's stored gallery
pub fn plan_history_gallery(
    history: &EventHistory,
    request: &UpdateHistoryRequest,
    links: &MediaLinkResolver,
) -> GalleryMerge {
    let keep = request
        .keep_media
        .as_ref()
        .and_then(parse_keep_list)
        .map(|keep| links.normalize_keep_list(keep, Provenance::History));

    merge_gallery_detailed(
        history.media_links.as_ref().unwrap_or(&Value::Null),
        keep.as_deref(),
        &request.media_uploads,
    )
}

#[derive(Debug, Clone)]
pub struct HistoryService {
    db: DatabaseService,
    links: MediaLinkResolver,
}

impl HistoryService {
    pub fn new(db: DatabaseService, links: MediaLinkResolver) -> Self {
        Self { db, links }
    }

    /// Create the history record of a past event
    pub async fn create_history(&self, request: CreateHistoryRequest) -> Result<EventHistory> {
        let event_id = request.event_id;
        if self.db.events.find_by_id(event_id).await?.is_none() {
            return Err(EventDeskError::EventNotFound { event_id });
        }
        if self.db.histories.find_by_event_id(event_id).await?.is_some() {
            return Err(EventDeskError::InvalidInput(format!(
                "Event {} already has a history record",
                event_id
            )));
        }

        let gallery = merge_gallery_detailed(&Value::Null, None, &request.media_uploads);
        let history = self
            .db
            .histories
            .create(&request, gallery_to_value(&gallery.items))
            .await?;

        log_event_action(event_id, "history_create", request.summary.as_deref());
        log_gallery_merge(event_id, gallery.retained, gallery.appended, gallery.items.len());
        Ok(history)
    }

    /// Update summary, stats and gallery of an event's history record
    pub async fn update_history(&self, event_id: i64, request: UpdateHistoryRequest) -> Result<EventHistory> {
        let mut tx = self.db.begin().await?;

        let history = self
            .db
            .histories
            .find_by_event_id_for_update(&mut tx, event_id)
            .await?
            .ok_or(EventDeskError::HistoryNotFound { event_id })?;

        let gallery = plan_history_gallery(&history, &request, &self.links);
        debug!(event_id = event_id, removed = gallery.removed, "History update planned");

        let updated = self
            .db
            .histories
            .update_locked(&mut tx, history.id, &request, gallery_to_value(&gallery.items))
            .await?;

        tx.commit().await?;

        log_event_action(event_id, "history_update", None);
        log_gallery_merge(event_id, gallery.retained, gallery.appended, gallery.items.len());
        Ok(updated)
    }

    pub async fn get_history(&self, event_id: i64) -> Result<EventHistory> {
        self.db
            .histories
            .find_by_event_id(event_id)
            .await?
            .ok_or(EventDeskError::HistoryNotFound { event_id })
    }
}
