//! Document checklist reconciliation against stored field shapes

mod helpers;

use helpers::*;
use serde_json::{json, Value};

use EventDesk::models::documents::UploadedDocumentSet;
use EventDesk::reconcile::{build_compliance_view, normalize_required_documents, parse_uploaded_documents};

#[test]
fn test_required_and_uploaded_object() {
    let view = build_compliance_view(&json!(["Aadhar", "Resume"]), &json!({"Aadhar": "file1.pdf"}));
    assert_eq!(view.uploaded, ["Aadhar"]);
    assert_eq!(view.pending, ["Resume"]);
    assert!(view.extra.is_empty());
}

#[test]
fn test_uploaded_as_comma_string() {
    let view = build_compliance_view(&json!(standard_checklist()), &json!("Aadhar, Resume"));
    assert_eq!(view.uploaded, ["Aadhar", "Resume"]);
    assert_eq!(view.pending, ["Photo"]);
}

#[test]
fn test_every_checklist_shape_reads_the_same() {
    let uploads = json!({"Resume": "r.pdf"});
    for raw in checklist_shapes(&standard_checklist()) {
        let view = build_compliance_view(&raw, &uploads);
        assert_eq!(view.uploaded, ["Resume"], "shape: {}", raw);
        assert_eq!(view.pending, ["Aadhar", "Photo"], "shape: {}", raw);
    }
}

#[test]
fn test_every_upload_shape_reads_the_same() {
    let shapes = vec![
        json!({"Photo": "p.jpg", "Aadhar": "a.pdf"}),
        json!("{\"Photo\": \"p.jpg\", \"Aadhar\": \"a.pdf\"}"),
        json!(["Photo", "Aadhar"]),
        json!([{"name": "Photo"}, {"name": "Aadhar", "filename": "a.pdf"}]),
        json!("Photo,Aadhar"),
    ];

    for raw in shapes {
        let view = build_compliance_view(&json!(standard_checklist()), &raw);
        assert_eq!(view.uploaded, ["Aadhar", "Photo"], "shape: {}", raw);
        assert_eq!(view.pending, ["Resume"], "shape: {}", raw);
    }
}

#[test]
fn test_uploads_outside_checklist_stay_visible() {
    let view = build_compliance_view(
        &json!(["Resume"]),
        &json!({"Old ID": "id.pdf", "Resume": "r.pdf"}),
    );
    assert_eq!(view.uploaded, ["Resume"]);
    assert_eq!(view.extra, ["Old ID"]);
    assert!(view.is_complete());
}

#[test]
fn test_nothing_stored() {
    let view = build_compliance_view(&Value::Null, &Value::Null);
    assert!(view.uploaded.is_empty() && view.pending.is_empty() && view.extra.is_empty());
    assert_eq!(view.completion_ratio(), 1.0);

    let view = build_compliance_view(&json!(["Resume"]), &Value::Null);
    assert_eq!(view.pending, ["Resume"]);
    assert_eq!(view.completion_ratio(), 0.0);
}

#[test]
fn test_corrupt_fields_never_fail() {
    let corrupt = [json!(false), json!(17), json!("null"), json!([null, [], {}]), json!("")];
    for required in &corrupt {
        let view = build_compliance_view(required, &json!({"Resume": "r.pdf"}));
        assert!(view.uploaded.is_empty(), "required: {}", required);
        assert!(view.pending.is_empty(), "required: {}", required);
    }
}

#[test]
fn test_normalized_checklist_is_canonical_json() {
    let list = normalize_required_documents(&json!(" Resume ,Aadhar,,Resume"));
    assert_eq!(list.to_value(), json!(["Resume", "Aadhar"]));
    assert_eq!(normalize_required_documents(&list.to_value()), list);
}

#[test]
fn test_incremental_uploads_accumulate() {
    let mut stored = Value::Null;
    for (name, file) in [("Aadhar", "a1.pdf"), ("Resume", "r1.pdf"), ("Aadhar", "a2.pdf")] {
        let mut set = parse_uploaded_documents(&stored);
        set.record(name, Some(file.to_string()), None);
        stored = set.to_value();
    }

    assert_eq!(stored, json!({"Aadhar": "a2.pdf", "Resume": "r1.pdf"}));
    let set: UploadedDocumentSet = parse_uploaded_documents(&stored);
    assert_eq!(set.len(), 2);
}
