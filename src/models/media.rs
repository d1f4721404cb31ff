//! Media gallery model

use serde::{Deserialize, Serialize};

/// Kind of a gallery entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Interpret a stored kind label. `image` is accepted as a synonym of `photo`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "photo" | "image" => Some(MediaKind::Photo),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Classify an upload by its declared MIME category
    pub fn from_mime_category(mime_category: &str) -> Self {
        if mime_category.starts_with("image") {
            MediaKind::Photo
        } else {
            MediaKind::Video
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One gallery entry; `url` is the bare stored filename
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: String,
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self { url: url.into(), kind }
    }

    pub fn photo(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::Photo)
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::Video)
    }
}

/// Table a media file was uploaded through, which decides its storage area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Event,
    History,
}

/// Gallery entry tagged with where its file lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcedMediaItem {
    #[serde(flatten)]
    pub item: MediaItem,
    pub provenance: Provenance,
}

/// A file staged by the upload collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDescriptor {
    pub stored_name: String,
    pub mime_category: String,
}

impl UploadDescriptor {
    pub fn new(stored_name: impl Into<String>, mime_category: impl Into<String>) -> Self {
        Self {
            stored_name: stored_name.into(),
            mime_category: mime_category.into(),
        }
    }
}
