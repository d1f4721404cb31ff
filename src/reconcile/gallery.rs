//! Media gallery merging
//!
//! Galleries are ordered: retained existing entries first, then new uploads
//! in submission order. That order is what gets displayed, so every merge
//! of the same inputs must reproduce it exactly. Urls are unique within a
//! gallery and the earliest entry for a url wins.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::parser::{parse_media_field, retain_first};
use crate::models::media::{MediaItem, MediaKind, Provenance, SourcedMediaItem, UploadDescriptor};

/// Result of a merge, with the counts callers log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryMerge {
    pub items: Vec<MediaItem>,
    /// Existing entries that survived the keep-list
    pub retained: usize,
    /// Existing entries removed by the keep-list
    pub removed: usize,
    /// New uploads that made it into the gallery
    pub appended: usize,
}

/// Merge stored media with a batch of new uploads.
///
/// With `keep_urls` present only existing entries it names survive; without
/// it every existing entry does.
pub fn merge_gallery(
    existing: &Value,
    keep_urls: Option<&[String]>,
    new_uploads: &[UploadDescriptor],
) -> Vec<MediaItem> {
    merge_gallery_detailed(existing, keep_urls, new_uploads).items
}

pub fn merge_gallery_detailed(
    existing: &Value,
    keep_urls: Option<&[String]>,
    new_uploads: &[UploadDescriptor],
) -> GalleryMerge {
    let candidates = retain_first(parse_media_field(existing), |item| item.url.clone());
    let candidate_count = candidates.len();

    let retained: Vec<MediaItem> = match keep_urls {
        Some(keep) => {
            let keep: HashSet<&str> = keep.iter().map(|url| url.trim()).collect();
            candidates
                .into_iter()
                .filter(|item| keep.contains(item.url.as_str()))
                .collect()
        }
        None => candidates,
    };
    let retained_count = retained.len();

    let mut items = retained;
    items.extend(new_uploads.iter().filter_map(upload_to_item));
    let items = retain_first(items, |item| item.url.clone());

    GalleryMerge {
        appended: items.len() - retained_count,
        removed: candidate_count - retained_count,
        retained: retained_count,
        items,
    }
}

/// Combine an event's own media with its history record's media.
///
/// Event entries come first; a url present in both keeps its event entry.
pub fn assemble_gallery(event_media: &Value, history_media: &Value) -> Vec<SourcedMediaItem> {
    let tagged = |raw: &Value, provenance: Provenance| {
        parse_media_field(raw)
            .into_iter()
            .map(move |item| SourcedMediaItem { item, provenance })
    };

    let combined: Vec<SourcedMediaItem> = tagged(event_media, Provenance::Event)
        .chain(tagged(history_media, Provenance::History))
        .collect();

    retain_first(combined, |sourced| sourced.item.url.clone())
}

/// Canonical persisted form of a gallery
pub fn gallery_to_value(items: &[MediaItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "url": item.url,
                    "kind": item.kind.as_str(),
                })
            })
            .collect(),
    )
}

fn upload_to_item(upload: &UploadDescriptor) -> Option<MediaItem> {
    let url = upload.stored_name.trim();
    if url.is_empty() {
        debug!(mime_category = %upload.mime_category, "Skipping upload without a stored name");
        return None;
    }
    Some(MediaItem::new(url, MediaKind::from_mime_category(upload.mime_category.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keep(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keep_then_append() {
        let merged = merge_gallery(
            &json!([{"url": "a.png", "type": "photo"}]),
            Some(keep(&["a.png"]).as_slice()),
            &[UploadDescriptor::new("b.mp4", "video/mp4")],
        );
        assert_eq!(merged, vec![MediaItem::photo("a.png"), MediaItem::video("b.mp4")]);
    }

    #[test]
    fn test_malformed_existing_is_empty() {
        let merged = merge_gallery(&json!("{oops"), None, &[UploadDescriptor::new("c.png", "image/png")]);
        assert_eq!(merged, vec![MediaItem::photo("c.png")]);
    }

    #[test]
    fn test_append_preserves_order() {
        let existing = json!([
            {"url": "a.png", "kind": "photo"},
            {"url": "b.png", "kind": "photo"}
        ]);
        let merged = merge_gallery(&existing, None, &[UploadDescriptor::new("c.mp4", "video/mp4")]);
        assert_eq!(
            merged,
            vec![MediaItem::photo("a.png"), MediaItem::photo("b.png"), MediaItem::video("c.mp4")]
        );
    }

    #[test]
    fn test_keep_list_removes_unlisted() {
        let existing = json!([
            {"url": "a.png", "kind": "photo"},
            {"url": "b.png", "kind": "photo"},
            {"url": "c.mp4", "kind": "video"}
        ]);
        let outcome = merge_gallery_detailed(&existing, Some(keep(&["c.mp4", "a.png", "zzz.png"]).as_slice()), &[]);
        assert_eq!(outcome.items, vec![MediaItem::photo("a.png"), MediaItem::video("c.mp4")]);
        assert_eq!(outcome.retained, 2);
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.appended, 0);
    }

    #[test]
    fn test_empty_keep_list_clears_existing() {
        let merged = merge_gallery(
            &json!([{"url": "a.png", "kind": "photo"}]),
            Some(&[][..]),
            &[UploadDescriptor::new("b.png", "image/png")],
        );
        assert_eq!(merged, vec![MediaItem::photo("b.png")]);
    }

    #[test]
    fn test_reupload_of_kept_url_keeps_first() {
        let outcome = merge_gallery_detailed(
            &json!([{"url": "a.png", "kind": "photo"}]),
            Some(keep(&["a.png"]).as_slice()),
            &[
                UploadDescriptor::new("a.png", "video/mp4"),
                UploadDescriptor::new("b.png", "image/png"),
                UploadDescriptor::new("b.png", "image/png"),
                UploadDescriptor::new("  ", "image/png"),
            ],
        );
        assert_eq!(outcome.items, vec![MediaItem::photo("a.png"), MediaItem::photo("b.png")]);
        assert_eq!(outcome.appended, 1);
    }

    #[test]
    fn test_duplicate_existing_entries_collapse() {
        let existing = json!([
            {"url": "a.png", "kind": "photo"},
            {"url": "a.png", "kind": "video"}
        ]);
        assert_eq!(merge_gallery(&existing, None, &[]), vec![MediaItem::photo("a.png")]);
    }

    #[test]
    fn test_assemble_event_before_history() {
        let event_media = json!([{"url": "a.png", "kind": "photo"}, {"url": "shared.mp4", "kind": "video"}]);
        let history_media = json!("[{\"url\":\"shared.mp4\",\"type\":\"video\"},{\"url\":\"h.png\",\"type\":\"photo\"}]");

        let gallery = assemble_gallery(&event_media, &history_media);
        let summary: Vec<(&str, Provenance)> = gallery
            .iter()
            .map(|s| (s.item.url.as_str(), s.provenance))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.png", Provenance::Event),
                ("shared.mp4", Provenance::Event),
                ("h.png", Provenance::History),
            ]
        );
    }

    #[test]
    fn test_assemble_with_missing_sources() {
        assert!(assemble_gallery(&Value::Null, &json!("garbage")).is_empty());
        let only_history = assemble_gallery(&Value::Null, &json!([{"url": "h.png", "kind": "photo"}]));
        assert_eq!(only_history.len(), 1);
        assert_eq!(only_history[0].provenance, Provenance::History);
    }

    #[test]
    fn test_gallery_value_reads_back() {
        let items = vec![MediaItem::photo("a.png"), MediaItem::video("b.mp4")];
        let value = gallery_to_value(&items);
        assert_eq!(value, json!([{"url": "a.png", "kind": "photo"}, {"url": "b.mp4", "kind": "video"}]));
        assert_eq!(merge_gallery(&value, None, &[]), items);
    }
}
