//! Document checklist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document names an event requires, trimmed, non-empty and unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredDocumentList(Vec<String>);

impl RequiredDocumentList {
    /// Build from names, trimming them and dropping blanks and repeats
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !list.iter().any(|existing| existing == name) {
                list.push(name.to_string());
            }
        }
        Self(list)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|required| required == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical persisted form: a JSON array of names
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }
}

/// Metadata for one uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub filename: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// A registrant's uploads keyed by document name, in first-upload order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedDocumentSet {
    entries: Vec<UploadedDocument>,
}

impl UploadedDocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an upload, overwriting any earlier entry of the same name in place.
    /// Blank names are ignored.
    pub fn record(
        &mut self,
        name: &str,
        filename: Option<String>,
        uploaded_at: Option<DateTime<Utc>>,
    ) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.filename = filename;
                entry.uploaded_at = uploaded_at;
            }
            None => self.entries.push(UploadedDocument {
                name: name.to_string(),
                filename,
                uploaded_at,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UploadedDocument> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedDocument> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical persisted form: a JSON object keyed by document name.
    ///
    /// Entries with a timestamp are written as `{filename, uploaded_at}`,
    /// the rest as the bare filename (or `null` when none was tracked).
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        for entry in &self.entries {
            let filename = entry
                .filename
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null);
            let value = match entry.uploaded_at {
                Some(at) => {
                    let mut meta = Map::new();
                    meta.insert("filename".to_string(), filename);
                    meta.insert("uploaded_at".to_string(), Value::String(at.to_rfc3339()));
                    Value::Object(meta)
                }
                None => filename,
            };
            object.insert(entry.name.clone(), value);
        }
        Value::Object(object)
    }
}

/// Uploaded/pending split of one registrant against one checklist.
///
/// `uploaded` and `pending` follow checklist order; `extra` lists uploads the
/// checklist does not (or no longer) name, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceView {
    pub uploaded: Vec<String>,
    pub pending: Vec<String>,
    pub extra: Vec<String>,
}

impl ComplianceView {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Share of required documents supplied, 1.0 when nothing is required
    pub fn completion_ratio(&self) -> f64 {
        let required = self.uploaded.len() + self.pending.len();
        if required == 0 {
            1.0
        } else {
            self.uploaded.len() as f64 / required as f64
        }
    }
}
