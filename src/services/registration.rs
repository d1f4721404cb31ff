//! Registration service implementation
//!
//! Registers attendees, records their document uploads and reports their
//! compliance against the event's checklist.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::database::DatabaseService;
use crate::models::documents::{ComplianceView, UploadedDocumentSet};
use crate::models::registration::{Registration, RegisterRequest, DocumentUploadRequest};
use crate::reconcile::{build_compliance_view, compute_compliance, normalize_required_documents, parse_uploaded_documents};
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::logging::log_document_upload;

/// Add one upload to a stored documents field.
///
/// A document uploaded again replaces the earlier file under the same name.
pub fn apply_document_upload(
    documents: &Value,
    upload: &DocumentUploadRequest,
    uploaded_at: DateTime<Utc>,
) -> Result<UploadedDocumentSet> {
    let name = upload.document_name.trim();
    if name.is_empty() {
        return Err(EventDeskError::InvalidInput("Document name is required".to_string()));
    }
    let stored_name = upload.stored_name.trim();
    if stored_name.is_empty() {
        return Err(EventDeskError::InvalidInput("Stored file name is required".to_string()));
    }

    let mut set = parse_uploaded_documents(documents);
    set.record(name, Some(stored_name.to_string()), Some(uploaded_at));
    Ok(set)
}

#[derive(Debug, Clone)]
pub struct RegistrationService {
    db: DatabaseService,
}

impl RegistrationService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Register an attendee for an event
    pub async fn register(&self, request: RegisterRequest) -> Result<Registration> {
        let event_id = request.event_id;
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventDeskError::EventNotFound { event_id })?;

        if !event.is_active {
            return Err(EventDeskError::InvalidInput(format!("Event {} is not open for registration", event_id)));
        }
        if self.db.registrations.is_registered(event_id, request.attendee_id).await? {
            return Err(EventDeskError::DuplicateRegistration {
                event_id,
                attendee_id: request.attendee_id,
            });
        }

        let registration = self.db.registrations.create(&request).await?;
        info!(
            registration_id = registration.id,
            event_id = event_id,
            attendee_id = request.attendee_id,
            "Attendee registered"
        );
        Ok(registration)
    }

    /// Record an uploaded document and return the updated compliance view.
    ///
    /// The registration row is locked for the duration, so two uploads for
    /// the same registrant cannot overwrite each other's entries.
    pub async fn record_document_upload(
        &self,
        registration_id: i64,
        upload: DocumentUploadRequest,
    ) -> Result<ComplianceView> {
        let mut tx = self.db.begin().await?;

        let registration = self
            .db
            .registrations
            .find_by_id_for_update(&mut tx, registration_id)
            .await?
            .ok_or(EventDeskError::RegistrationNotFound { registration_id })?;

        let event_id = registration.event_id;
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventDeskError::EventNotFound { event_id })?;

        let documents = registration.documents.as_ref().unwrap_or(&Value::Null);
        let uploads = apply_document_upload(documents, &upload, Utc::now())?;

        self.db
            .registrations
            .set_documents_locked(&mut tx, registration_id, uploads.to_value())
            .await?;
        tx.commit().await?;

        let required = normalize_required_documents(event.required_documents.as_ref().unwrap_or(&Value::Null));
        log_document_upload(
            registration_id,
            upload.document_name.trim(),
            upload.stored_name.trim(),
            required.contains(upload.document_name.trim()),
        );

        Ok(compute_compliance(&required, &uploads))
    }

    /// Compliance of one registration against its event's checklist
    pub async fn compliance(&self, registration_id: i64) -> Result<ComplianceView> {
        let registration = self
            .db
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(EventDeskError::RegistrationNotFound { registration_id })?;

        let event_id = registration.event_id;
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventDeskError::EventNotFound { event_id })?;

        Ok(build_compliance_view(
            event.required_documents.as_ref().unwrap_or(&Value::Null),
            registration.documents.as_ref().unwrap_or(&Value::Null),
        ))
    }
}
