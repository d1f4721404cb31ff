//! Test helpers module
//!
//! Fixtures for the reconciliation tests: raw document and media fields in
//! each shape stored rows are known to carry.

#![allow(dead_code)]

use fake::faker::lorem::en::Word;
use fake::Fake;
use serde_json::{json, Value};

use EventDesk::models::media::UploadDescriptor;

/// Required documents used across the checklist scenarios
pub fn standard_checklist() -> Vec<&'static str> {
    vec!["Aadhar", "Resume", "Photo"]
}

/// The same names in every supported raw shape
pub fn checklist_shapes(names: &[&str]) -> Vec<Value> {
    let encoded = serde_json::to_string(names).unwrap();
    vec![
        json!(names),
        Value::String(encoded.clone()),
        Value::String(names.join(", ")),
        Value::String(serde_json::to_string(&encoded).unwrap()),
    ]
}

/// Media entry as written by the legacy uploader (`type` key)
pub fn legacy_media(url: &str, kind: &str) -> Value {
    json!({"url": url, "type": kind})
}

pub fn image_upload(stored_name: &str) -> UploadDescriptor {
    UploadDescriptor::new(stored_name, "image/jpeg")
}

pub fn video_upload(stored_name: &str) -> UploadDescriptor {
    UploadDescriptor::new(stored_name, "video/mp4")
}

/// A random stored filename
pub fn random_stored_name(extension: &str) -> String {
    let stem: String = Word().fake();
    let suffix: u32 = (1000..9999).fake();
    format!("{}-{}.{}", stem, suffix, extension)
}
