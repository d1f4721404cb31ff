//! Document checklist reconciliation
//!
//! Matches a registrant's uploads against an event's required documents.
//! Matching is exact and case-sensitive.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::parser::{is_bare_scalar, parse_list_field, split_comma_list, RawField};
use crate::models::documents::{ComplianceView, RequiredDocumentList, UploadedDocumentSet};

/// Canonicalize a stored or submitted checklist
pub fn normalize_required_documents(raw: &Value) -> RequiredDocumentList {
    RequiredDocumentList::from_names(parse_list_field(raw))
}

/// Read a registrant's uploads from any supported shape.
///
/// Objects map names to a filename or to `{filename, uploaded_at}`; lists
/// hold plain names or `{name, ...}` objects; plain text is a comma list of
/// names. Names read without a filename are recorded as present.
pub fn parse_uploaded_documents(raw: &Value) -> UploadedDocumentSet {
    let mut set = UploadedDocumentSet::new();

    match RawField::classify(raw) {
        RawField::Object(map) => {
            for (name, meta) in &map {
                let (filename, uploaded_at) = upload_metadata(meta);
                set.record(name, filename, uploaded_at);
            }
        }
        RawField::List(items) => {
            for item in &items {
                match item {
                    Value::String(name) => set.record(name, None, None),
                    Value::Object(entry) => match entry.get("name").and_then(Value::as_str) {
                        Some(name) => {
                            let (filename, uploaded_at) = object_metadata(entry);
                            set.record(name, filename, uploaded_at);
                        }
                        None => debug!(entry = ?entry, "Skipping uploaded document without a name"),
                    },
                    other => debug!(element = %other, "Skipping unreadable uploaded document"),
                }
            }
        }
        RawField::Text(text) => {
            for name in split_comma_list(&text) {
                set.record(&name, None, None);
            }
        }
        RawField::Absent => {}
    }

    set
}

/// Number of stored entries, or entry payloads, [`parse_uploaded_documents`]
/// cannot carry over.
///
/// A name mapped to `null`, `true` or `false` is a presence marker and
/// counts as read.
pub fn unreadable_uploaded_documents(raw: &Value) -> usize {
    match RawField::classify(raw) {
        RawField::Object(map) => map.values().filter(|meta| !metadata_readable(meta)).count(),
        RawField::List(items) => items
            .iter()
            .filter(|item| match item {
                Value::String(_) => false,
                Value::Object(entry) => {
                    !entry.get("name").is_some_and(Value::is_string) || !object_metadata_readable(entry)
                }
                _ => true,
            })
            .count(),
        RawField::Text(_) => 0,
        RawField::Absent => usize::from(is_bare_scalar(raw)),
    }
}

/// Split a checklist into supplied and outstanding documents
pub fn compute_compliance(required: &RequiredDocumentList, uploads: &UploadedDocumentSet) -> ComplianceView {
    let (uploaded, pending): (Vec<String>, Vec<String>) = required
        .names()
        .iter()
        .cloned()
        .partition(|name| uploads.contains(name));

    let extra = uploads
        .names()
        .filter(|name| !required.contains(name))
        .map(str::to_string)
        .collect();

    ComplianceView { uploaded, pending, extra }
}

/// Compliance view straight from the two raw stored fields
pub fn build_compliance_view(required_docs: &Value, uploaded_docs: &Value) -> ComplianceView {
    let required = normalize_required_documents(required_docs);
    let uploads = parse_uploaded_documents(uploaded_docs);
    compute_compliance(&required, &uploads)
}

fn upload_metadata(meta: &Value) -> (Option<String>, Option<DateTime<Utc>>) {
    match meta {
        Value::String(filename) => (non_empty(filename), None),
        Value::Object(entry) => object_metadata(entry),
        _ => (None, None),
    }
}

fn object_metadata(entry: &Map<String, Value>) -> (Option<String>, Option<DateTime<Utc>>) {
    let filename = entry
        .get("filename")
        .and_then(Value::as_str)
        .and_then(non_empty);
    let uploaded_at = entry
        .get("uploaded_at")
        .and_then(Value::as_str)
        .and_then(|at| DateTime::parse_from_rfc3339(at).ok())
        .map(|at| at.with_timezone(&Utc));
    (filename, uploaded_at)
}

fn metadata_readable(meta: &Value) -> bool {
    match meta {
        Value::Null | Value::Bool(_) | Value::String(_) => true,
        Value::Object(entry) => object_metadata_readable(entry),
        Value::Array(_) | Value::Number(_) => false,
    }
}

fn object_metadata_readable(entry: &Map<String, Value>) -> bool {
    let filename_ok = entry.get("filename").map_or(true, |f| f.is_string() || f.is_null());
    let uploaded_at_ok = entry.get("uploaded_at").map_or(true, |at| {
        at.is_null()
            || at
                .as_str()
                .is_some_and(|at| DateTime::parse_from_rfc3339(at).is_ok())
    });
    filename_ok && uploaded_at_ok
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_object_of_filenames() {
        let view = build_compliance_view(&json!(["Aadhar", "Resume"]), &json!({"Aadhar": "file1.pdf"}));
        assert_eq!(view.uploaded, names(&["Aadhar"]));
        assert_eq!(view.pending, names(&["Resume"]));
        assert!(view.extra.is_empty());
    }

    #[test]
    fn test_comma_string_uploads() {
        let view = build_compliance_view(&json!(["Aadhar", "Resume", "Photo"]), &json!("Aadhar, Resume"));
        assert_eq!(view.uploaded, names(&["Aadhar", "Resume"]));
        assert_eq!(view.pending, names(&["Photo"]));
    }

    #[test]
    fn test_list_of_name_objects() {
        let view = build_compliance_view(
            &json!("Aadhar,Resume"),
            &json!([{"name": "Resume", "filename": "r.pdf"}, {"filename": "orphan.pdf"}, 7]),
        );
        assert_eq!(view.uploaded, names(&["Resume"]));
        assert_eq!(view.pending, names(&["Aadhar"]));
    }

    #[test]
    fn test_extra_uploads_are_kept_visible() {
        let view = build_compliance_view(
            &json!(["Resume"]),
            &json!({"PAN": "p.pdf", "Resume": "r.pdf", "Passport": "x.pdf"}),
        );
        assert_eq!(view.uploaded, names(&["Resume"]));
        assert_eq!(view.extra, names(&["PAN", "Passport"]));
    }

    #[test]
    fn test_results_follow_checklist_order() {
        let view = build_compliance_view(
            &json!(["Photo", "Aadhar", "Resume", "PAN"]),
            &json!(["PAN", "Photo"]),
        );
        assert_eq!(view.uploaded, names(&["Photo", "PAN"]));
        assert_eq!(view.pending, names(&["Aadhar", "Resume"]));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let view = build_compliance_view(&json!(["Resume"]), &json!(["resume"]));
        assert_eq!(view.pending, names(&["Resume"]));
        assert_eq!(view.extra, names(&["resume"]));
    }

    #[test]
    fn test_duplicate_requirements_count_once() {
        let view = build_compliance_view(&json!(["Resume", " Resume", "Resume"]), &Value::Null);
        assert_eq!(view.pending, names(&["Resume"]));
    }

    #[test]
    fn test_malformed_fields_degrade_to_empty() {
        let view = build_compliance_view(&json!(12), &json!({"broken": ["x"]}));
        assert!(view.uploaded.is_empty());
        assert!(view.pending.is_empty());
        assert_eq!(view.extra, names(&["broken"]));
        assert!(view.is_complete());
    }

    #[test]
    fn test_unreadable_upload_entries_are_counted() {
        assert_eq!(unreadable_uploaded_documents(&json!({"broken": ["x"], "Aadhar": "a.pdf"})), 1);
        assert_eq!(
            unreadable_uploaded_documents(&json!({
                "Resume": {"filename": "r.pdf", "uploaded_at": "yesterday"},
                "Photo": true,
                "Aadhar": null
            })),
            1
        );
        assert_eq!(
            unreadable_uploaded_documents(&json!(["Aadhar", {"filename": "orphan.pdf"}, 7, {"name": "Resume"}])),
            2
        );
        assert_eq!(unreadable_uploaded_documents(&json!("Aadhar, Resume")), 0);
        assert_eq!(unreadable_uploaded_documents(&json!(12)), 1);
    }

    #[test]
    fn test_upload_metadata_with_timestamp() {
        let set = parse_uploaded_documents(&json!({
            "Resume": {"filename": "r.pdf", "uploaded_at": "2024-05-01T10:00:00Z"},
            "Aadhar": "a.pdf",
            "Photo": null
        }));
        let resume = set.get("Resume").unwrap();
        assert_eq!(resume.filename.as_deref(), Some("r.pdf"));
        assert_eq!(resume.uploaded_at, Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
        assert_eq!(set.get("Aadhar").unwrap().filename.as_deref(), Some("a.pdf"));
        assert!(set.get("Photo").unwrap().filename.is_none());
    }

    #[test]
    fn test_persisted_form_reads_back() {
        let mut set = UploadedDocumentSet::new();
        set.record("Aadhar", Some("a.pdf".to_string()), Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()));
        set.record("Resume", Some("r.pdf".to_string()), None);

        assert_eq!(parse_uploaded_documents(&set.to_value()), set);
    }
}
