//! Stored-field normalization sweep
//!
//! Older rows carry checklists, galleries and document sets in whatever
//! shape they were first written in. The sweep pages through every event,
//! history record and registration and rewrites those fields in canonical
//! form, leaving rows that are already canonical untouched.

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::NormalizerConfig;
use crate::database::DatabaseService;
use crate::models::event::Event;
use crate::models::history::EventHistory;
use crate::models::registration::Registration;
use crate::reconcile::{
    gallery_to_value, merge_gallery, normalize_required_documents, parse_uploaded_documents,
    unreadable_list_elements, unreadable_media_elements, unreadable_uploaded_documents,
};
use crate::utils::errors::Result;
use crate::utils::helpers::calculate_offset;

/// What the sweep should do with one stored row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRewrite<T> {
    /// Stored fields are already canonical
    Unchanged,
    Rewrite(T),
    /// The canonical form would lose `dropped` stored elements, so the row
    /// is left as it is
    Held { dropped: usize },
}

impl<T> FieldRewrite<T> {
    fn decide(dropped: usize, changed: bool, canonical: impl FnOnce() -> T) -> Self {
        if dropped > 0 {
            FieldRewrite::Held { dropped }
        } else if changed {
            FieldRewrite::Rewrite(canonical())
        } else {
            FieldRewrite::Unchanged
        }
    }
}

/// Counts from one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub events_scanned: usize,
    pub events_rewritten: usize,
    pub events_held: usize,
    pub histories_scanned: usize,
    pub histories_rewritten: usize,
    pub histories_held: usize,
    pub registrations_scanned: usize,
    pub registrations_rewritten: usize,
    pub registrations_held: usize,
}

impl NormalizationReport {
    pub fn total_rewritten(&self) -> usize {
        self.events_rewritten + self.histories_rewritten + self.registrations_rewritten
    }

    /// Rows left untouched because they hold elements that cannot be read
    pub fn total_held(&self) -> usize {
        self.events_held + self.histories_held + self.registrations_held
    }
}

/// Canonical checklist and gallery of an event
pub fn canonical_event_fields(event: &Event) -> FieldRewrite<(Value, Value)> {
    let stored_required = event.required_documents.as_ref().unwrap_or(&Value::Null);
    let stored_media = event.media_links.as_ref().unwrap_or(&Value::Null);

    let required = normalize_required_documents(stored_required).to_value();
    let media = gallery_to_value(&merge_gallery(stored_media, None, &[]));

    let dropped = unreadable_list_elements(stored_required) + unreadable_media_elements(stored_media);
    let changed = required != *stored_required || media != *stored_media;
    FieldRewrite::decide(dropped, changed, || (required, media))
}

/// Canonical gallery of a history record
pub fn canonical_history_media(history: &EventHistory) -> FieldRewrite<Value> {
    let stored = history.media_links.as_ref().unwrap_or(&Value::Null);
    let media = gallery_to_value(&merge_gallery(stored, None, &[]));
    FieldRewrite::decide(unreadable_media_elements(stored), media != *stored, || media)
}

/// Canonical uploaded-documents field of a registration
pub fn canonical_registration_documents(registration: &Registration) -> FieldRewrite<Value> {
    let stored = registration.documents.as_ref().unwrap_or(&Value::Null);
    let documents = parse_uploaded_documents(stored).to_value();
    FieldRewrite::decide(unreadable_uploaded_documents(stored), documents != *stored, || documents)
}

#[derive(Debug, Clone)]
pub struct NormalizerService {
    db: DatabaseService,
    config: NormalizerConfig,
}

impl NormalizerService {
    pub fn new(db: DatabaseService, config: NormalizerConfig) -> Self {
        Self { db, config }
    }

    /// Run one full sweep over all three tables
    pub async fn run(&self) -> Result<NormalizationReport> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, dry_run = self.config.dry_run, batch_size = self.config.batch_size, "Normalization sweep started");

        let mut report = NormalizationReport::default();
        self.sweep_events(run_id, &mut report).await?;
        self.sweep_histories(run_id, &mut report).await?;
        self.sweep_registrations(run_id, &mut report).await?;

        info!(
            run_id = %run_id,
            events = report.events_rewritten,
            histories = report.histories_rewritten,
            registrations = report.registrations_rewritten,
            held = report.total_held(),
            dry_run = self.config.dry_run,
            "Normalization sweep finished"
        );
        Ok(report)
    }

    async fn sweep_events(&self, run_id: Uuid, report: &mut NormalizationReport) -> Result<()> {
        let batch = self.config.batch_size as usize;
        let mut page = 1;
        loop {
            let events = self
                .db
                .events
                .list(batch as i64, calculate_offset(page, batch) as i64)
                .await?;
            report.events_scanned += events.len();

            for event in &events {
                match canonical_event_fields(event) {
                    FieldRewrite::Unchanged => {}
                    FieldRewrite::Rewrite((required, media)) => {
                        debug!(run_id = %run_id, event_id = event.id, "Event fields not canonical");
                        if !self.config.dry_run {
                            self.db.events.set_reconciled_fields(event.id, required, media).await?;
                        }
                        report.events_rewritten += 1;
                    }
                    FieldRewrite::Held { dropped } => {
                        warn!(run_id = %run_id, event_id = event.id, dropped = dropped, "Event holds unreadable elements, left as stored");
                        report.events_held += 1;
                    }
                }
            }

            if events.len() < batch {
                return Ok(());
            }
            page += 1;
        }
    }

    async fn sweep_histories(&self, run_id: Uuid, report: &mut NormalizationReport) -> Result<()> {
        let batch = self.config.batch_size as usize;
        let mut page = 1;
        loop {
            let histories = self
                .db
                .histories
                .list(batch as i64, calculate_offset(page, batch) as i64)
                .await?;
            report.histories_scanned += histories.len();

            for history in &histories {
                match canonical_history_media(history) {
                    FieldRewrite::Unchanged => {}
                    FieldRewrite::Rewrite(media) => {
                        debug!(run_id = %run_id, event_id = history.event_id, "History media not canonical");
                        if !self.config.dry_run {
                            self.db.histories.set_media_links(history.id, media).await?;
                        }
                        report.histories_rewritten += 1;
                    }
                    FieldRewrite::Held { dropped } => {
                        warn!(run_id = %run_id, event_id = history.event_id, dropped = dropped, "History media holds unreadable elements, left as stored");
                        report.histories_held += 1;
                    }
                }
            }

            if histories.len() < batch {
                return Ok(());
            }
            page += 1;
        }
    }

    async fn sweep_registrations(&self, run_id: Uuid, report: &mut NormalizationReport) -> Result<()> {
        let batch = self.config.batch_size as usize;
        let mut page = 1;
        loop {
            let registrations = self
                .db
                .registrations
                .list(batch as i64, calculate_offset(page, batch) as i64)
                .await?;
            report.registrations_scanned += registrations.len();

            for registration in &registrations {
                match canonical_registration_documents(registration) {
                    FieldRewrite::Unchanged => {}
                    FieldRewrite::Rewrite(documents) => {
                        debug!(run_id = %run_id, registration_id = registration.id, "Registration documents not canonical");
                        if !self.config.dry_run {
                            self.db.registrations.set_documents(registration.id, documents).await?;
                        }
                        report.registrations_rewritten += 1;
                    }
                    FieldRewrite::Held { dropped } => {
                        warn!(run_id = %run_id, registration_id = registration.id, dropped = dropped, "Registration documents hold unreadable entries, left as stored");
                        report.registrations_held += 1;
                    }
                }
            }

            if registrations.len() < batch {
                return Ok(());
            }
            page += 1;
        }
    }
}
