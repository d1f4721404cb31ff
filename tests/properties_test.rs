//! Property tests for the reconciliation invariants

use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::{json, Value};

use EventDesk::models::media::{MediaItem, MediaKind, UploadDescriptor};
use EventDesk::reconcile::{build_compliance_view, gallery_to_value, merge_gallery};

fn document_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,11}".prop_map(|name| name.trim().to_string())
}

fn stored_name() -> impl Strategy<Value = String> {
    "[a-e]{1,2}\\.(png|mp4)"
}

fn media_item() -> impl Strategy<Value = MediaItem> {
    (stored_name(), any::<bool>()).prop_map(|(url, photo)| {
        MediaItem::new(url, if photo { MediaKind::Photo } else { MediaKind::Video })
    })
}

fn upload() -> impl Strategy<Value = UploadDescriptor> {
    (stored_name(), prop_oneof![Just("image/png"), Just("video/mp4")])
        .prop_map(|(name, mime)| UploadDescriptor::new(name, mime))
}

fn existing_field(items: &[MediaItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| json!({"url": item.url, "type": item.kind.as_str()}))
            .collect(),
    )
}

proptest! {
    #[test]
    fn uploaded_and_pending_partition_the_checklist(
        required in prop::collection::vec(document_name(), 0..8),
        uploaded in prop::collection::vec(document_name(), 0..8),
    ) {
        let view = build_compliance_view(&json!(required), &json!(uploaded));

        let mut expected: Vec<String> = Vec::new();
        for name in &required {
            if !expected.contains(name) {
                expected.push(name.clone());
            }
        }

        let uploaded_set: HashSet<&String> = view.uploaded.iter().collect();
        let pending_set: HashSet<&String> = view.pending.iter().collect();
        prop_assert!(uploaded_set.is_disjoint(&pending_set));

        let union: HashSet<&String> = uploaded_set.union(&pending_set).copied().collect();
        let expected_set: HashSet<&String> = expected.iter().collect();
        prop_assert_eq!(union, expected_set);
        prop_assert_eq!(view.uploaded.len() + view.pending.len(), expected.len());
    }

    #[test]
    fn merging_without_uploads_is_idempotent(
        existing in prop::collection::vec(media_item(), 0..10),
        keep in prop::option::of(prop::collection::vec(stored_name(), 0..6)),
    ) {
        let once = merge_gallery(&existing_field(&existing), keep.as_deref(), &[]);
        let twice = merge_gallery(&gallery_to_value(&once), keep.as_deref(), &[]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merged_urls_are_unique(
        existing in prop::collection::vec(media_item(), 0..10),
        keep in prop::option::of(prop::collection::vec(stored_name(), 0..6)),
        uploads in prop::collection::vec(upload(), 0..6),
    ) {
        let merged = merge_gallery(&existing_field(&existing), keep.as_deref(), &uploads);
        let urls: HashSet<&str> = merged.iter().map(|item| item.url.as_str()).collect();
        prop_assert_eq!(urls.len(), merged.len());
    }

    #[test]
    fn existing_entries_precede_new_uploads(
        existing in prop::collection::vec(media_item(), 0..10),
        uploads in prop::collection::vec(upload(), 0..6),
    ) {
        let merged = merge_gallery(&existing_field(&existing), None, &uploads);

        let mut expected: Vec<String> = Vec::new();
        let candidates = existing
            .iter()
            .map(|item| item.url.clone())
            .chain(uploads.iter().map(|upload| upload.stored_name.clone()));
        for url in candidates {
            if !expected.contains(&url) {
                expected.push(url);
            }
        }

        let urls: Vec<String> = merged.into_iter().map(|item| item.url).collect();
        prop_assert_eq!(urls, expected);
    }
}
