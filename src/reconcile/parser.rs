//! Heterogeneous-input parsing
//!
//! Document and media fields reach us as native JSON arrays, JSON text,
//! comma-separated text, key-presence objects or nothing at all. Every field
//! is classified once into a [`RawField`]; the readers below only ever see
//! that canonical shape. Nothing here fails: input that cannot be read
//! resolves to an empty collection.

use std::collections::HashSet;
use std::hash::Hash;

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::media::{MediaItem, MediaKind};

/// How many times a JSON string literal is unwrapped before it is taken as text
const MAX_STRING_UNWRAP: usize = 1;

/// A loosely-typed field after shape classification
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    /// `null`, a blank string, or a scalar with no list reading
    Absent,
    List(Vec<Value>),
    Object(Map<String, Value>),
    /// Text that is not JSON
    Text(String),
}

impl RawField {
    pub fn classify(raw: &Value) -> Self {
        match raw {
            Value::Array(items) => RawField::List(items.clone()),
            Value::Object(map) => RawField::Object(map.clone()),
            Value::String(text) => Self::classify_text(text, 0),
            Value::Null => RawField::Absent,
            other => {
                debug!(value = %other, "Ignoring scalar in list-valued field");
                RawField::Absent
            }
        }
    }

    fn classify_text(text: &str, depth: usize) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RawField::Absent;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => RawField::List(items),
            Ok(Value::Object(map)) => RawField::Object(map),
            Ok(Value::String(inner)) if depth < MAX_STRING_UNWRAP => {
                Self::classify_text(&inner, depth + 1)
            }
            Ok(Value::String(inner)) => RawField::Text(inner),
            Ok(Value::Null) => RawField::Absent,
            // numbers and booleans read as a one-segment text
            Ok(_) | Err(_) => RawField::Text(trimmed.to_string()),
        }
    }
}

/// Read a list of names from any supported shape.
///
/// Lists contribute their string elements, objects their keys, and plain
/// text its comma-separated segments. Names are trimmed and blanks dropped;
/// order is preserved and repeats are kept.
pub fn parse_list_field(raw: &Value) -> Vec<String> {
    match RawField::classify(raw) {
        RawField::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => non_blank(name),
                other => {
                    debug!(element = %other, "Skipping non-string list element");
                    None
                }
            })
            .collect(),
        RawField::Object(map) => map.keys().filter_map(|key| non_blank(key)).collect(),
        RawField::Text(text) => split_comma_list(&text),
        RawField::Absent => Vec::new(),
    }
}

/// Read media entries from any supported shape.
///
/// Entries must be objects carrying a non-blank `url` and a recognised
/// `kind` (or `type`); anything else is skipped on its own. Text that is not
/// JSON has no media reading and yields nothing.
pub fn parse_media_field(raw: &Value) -> Vec<MediaItem> {
    match RawField::classify(raw) {
        RawField::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => media_item_from_object(map),
                other => {
                    debug!(element = %other, "Skipping non-object media element");
                    None
                }
            })
            .collect(),
        RawField::Object(map) => media_item_from_object(&map).into_iter().collect(),
        RawField::Text(text) => {
            debug!(text = %text, "Media field is not JSON, treating as empty");
            Vec::new()
        }
        RawField::Absent => Vec::new(),
    }
}

/// Read a client keep-list. `null` means no list was sent, so everything is
/// retained; any other value is an explicit (possibly empty) list.
pub fn parse_keep_list(raw: &Value) -> Option<Vec<String>> {
    match raw {
        Value::Null => None,
        other => Some(parse_list_field(other)),
    }
}

/// Number of stored elements [`parse_list_field`] cannot read.
///
/// Blank names are not counted; they carry nothing. A bare number or boolean
/// counts as one element.
pub fn unreadable_list_elements(raw: &Value) -> usize {
    match RawField::classify(raw) {
        RawField::List(items) => items.iter().filter(|item| !item.is_string()).count(),
        RawField::Object(_) | RawField::Text(_) => 0,
        RawField::Absent => usize::from(is_bare_scalar(raw)),
    }
}

/// Number of stored elements [`parse_media_field`] cannot read
pub fn unreadable_media_elements(raw: &Value) -> usize {
    match RawField::classify(raw) {
        RawField::List(items) => items
            .iter()
            .filter(|item| !matches!(item, Value::Object(map) if media_item_from_object(map).is_some()))
            .count(),
        RawField::Object(map) => usize::from(media_item_from_object(&map).is_none()),
        RawField::Text(_) => 1,
        RawField::Absent => usize::from(is_bare_scalar(raw)),
    }
}

pub(crate) fn is_bare_scalar(raw: &Value) -> bool {
    matches!(raw, Value::Bool(_) | Value::Number(_))
}

fn media_item_from_object(map: &Map<String, Value>) -> Option<MediaItem> {
    let url = map.get("url").and_then(Value::as_str).and_then(non_blank);
    let kind = map
        .get("kind")
        .and_then(Value::as_str)
        .or_else(|| map.get("type").and_then(Value::as_str))
        .and_then(MediaKind::from_label);

    match (url, kind) {
        (Some(url), Some(kind)) => Some(MediaItem { url, kind }),
        _ => {
            debug!(entry = ?map, "Skipping media entry without url or known kind");
            None
        }
    }
}

pub(crate) fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',').filter_map(non_blank).collect()
}

pub(crate) fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Drop every item whose key was already seen, keeping the first occurrence
pub fn retain_first<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}
