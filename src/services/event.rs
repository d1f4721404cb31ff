//! Event service implementation
//!
//! Creates and updates events, keeping the checklist and the event's own
//! gallery in canonical form, and serves the combined event + history
//! gallery with public links.

use serde_json::Value;
use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::documents::RequiredDocumentList;
use crate::models::event::{Event, CreateEventRequest, UpdateEventRequest};
use crate::models::media::Provenance;
use crate::reconcile::{
    assemble_gallery, gallery_to_value, merge_gallery_detailed, normalize_required_documents,
    parse_keep_list, GalleryMerge,
};
use crate::services::links::{MediaLinkResolver, ResolvedMediaItem};
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::helpers::truncate_text;
use crate::utils::logging::{log_event_action, log_gallery_merge};

/// Field changes computed for an event update
#[derive(Debug, Clone, PartialEq)]
pub struct EventUpdatePlan {
    /// Canonical replacement checklist, if one was submitted
    pub required_documents: Option<RequiredDocumentList>,
    pub gallery: GalleryMerge,
}

impl EventUpdatePlan {
    /// Work out the new checklist and gallery for `event` from `request`
    pub fn build(event: &Event, request: &UpdateEventRequest, links: &MediaLinkResolver) -> Self {
        let required_documents = request
            .required_documents
            .as_ref()
            .map(normalize_required_documents);

        let keep = request
            .keep_media
            .as_ref()
            .and_then(parse_keep_list)
            .map(|keep| links.normalize_keep_list(keep, Provenance::Event));

        let existing = event.media_links.as_ref().unwrap_or(&Value::Null);
        let gallery = merge_gallery_detailed(existing, keep.as_deref(), &request.media_uploads);

        Self { required_documents, gallery }
    }
}

/// Event service for managing event operations
#[derive(Debug, Clone)]
pub struct EventService {
    db: DatabaseService,
    links: MediaLinkResolver,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: DatabaseService, links: MediaLinkResolver) -> Self {
        Self { db, links }
    }

    /// Create an event with a canonical checklist and its initial gallery
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        if request.title.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Event title is required".to_string()));
        }

        let required = request
            .required_documents
            .as_ref()
            .map(normalize_required_documents)
            .unwrap_or_default();
        let gallery = merge_gallery_detailed(&Value::Null, None, &request.media_uploads);

        let event = self
            .db
            .events
            .create(&request, required.to_value(), gallery_to_value(&gallery.items))
            .await?;

        log_event_action(event.id, "create", Some(&truncate_text(&event.title, 80)));
        log_gallery_merge(event.id, gallery.retained, gallery.appended, gallery.items.len());
        Ok(event)
    }

    /// Update an event, merging uploads into its gallery.
    ///
    /// The event row stays locked from read to write, so concurrent uploads
    /// for the same event are applied one after the other.
    pub async fn update_event(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        let mut tx = self.db.begin().await?;

        let event = self
            .db
            .events
            .find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or(EventDeskError::EventNotFound { event_id })?;

        let plan = EventUpdatePlan::build(&event, &request, &self.links);
        debug!(
            event_id = event_id,
            removed = plan.gallery.removed,
            checklist_replaced = plan.required_documents.is_some(),
            "Event update planned"
        );

        let updated = self
            .db
            .events
            .update_locked(
                &mut tx,
                event_id,
                &request,
                plan.required_documents.as_ref().map(RequiredDocumentList::to_value),
                gallery_to_value(&plan.gallery.items),
            )
            .await?;

        tx.commit().await?;

        log_event_action(event_id, "update", None);
        log_gallery_merge(event_id, plan.gallery.retained, plan.gallery.appended, plan.gallery.items.len());
        Ok(updated)
    }

    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventDeskError::EventNotFound { event_id })
    }

    /// The event's checklist in canonical form
    pub async fn required_documents(&self, event_id: i64) -> Result<RequiredDocumentList> {
        let event = self.get_event(event_id).await?;
        Ok(normalize_required_documents(
            event.required_documents.as_ref().unwrap_or(&Value::Null),
        ))
    }

    /// Combined event and history gallery with public links
    pub async fn gallery(&self, event_id: i64) -> Result<Vec<ResolvedMediaItem>> {
        let (event, history) = futures::try_join!(
            self.db.events.find_by_id(event_id),
            self.db.histories.find_by_event_id(event_id),
        )?;
        let event = event.ok_or(EventDeskError::EventNotFound { event_id })?;

        let history_media = history
            .as_ref()
            .and_then(|history| history.media_links.as_ref())
            .unwrap_or(&Value::Null);
        let gallery = assemble_gallery(
            event.media_links.as_ref().unwrap_or(&Value::Null),
            history_media,
        );

        info!(event_id = event_id, items = gallery.len(), "Gallery assembled");
        self.links.resolve_all(&gallery)
    }
}
