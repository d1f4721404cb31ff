//! Absolute link composition for stored files
//!
//! The reconciliation layer only ever handles bare stored filenames. This
//! service turns them into public links for the right storage area, and
//! turns links a client sends back (for example in a keep-list) into the
//! stored filenames they point at.

use url::Url;

use crate::config::StorageConfig;
use crate::models::media::{MediaItem, Provenance, SourcedMediaItem};
use crate::utils::errors::{EventDeskError, Result};
use serde::{Deserialize, Serialize};

/// Gallery entry ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMediaItem {
    #[serde(flatten)]
    pub item: MediaItem,
    pub provenance: Provenance,
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct MediaLinkResolver {
    base: Url,
    events_path: Vec<String>,
    history_path: Vec<String>,
    documents_path: Vec<String>,
}

impl MediaLinkResolver {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(EventDeskError::Config(format!(
                "Storage base URL cannot be used as a base: {}",
                config.base_url
            )));
        }

        Ok(Self {
            base,
            events_path: split_path(&config.events_path),
            history_path: split_path(&config.history_path),
            documents_path: split_path(&config.documents_path),
        })
    }

    /// Public link of a media file in the area its provenance names
    pub fn media_link(&self, stored_name: &str, provenance: Provenance) -> Result<String> {
        self.compose(self.area(provenance), stored_name)
    }

    /// Public link of a registrant's document file
    pub fn document_link(&self, stored_name: &str) -> Result<String> {
        self.compose(&self.documents_path, stored_name)
    }

    pub fn resolve(&self, sourced: &SourcedMediaItem) -> Result<ResolvedMediaItem> {
        Ok(ResolvedMediaItem {
            link: self.media_link(&sourced.item.url, sourced.provenance)?,
            item: sourced.item.clone(),
            provenance: sourced.provenance,
        })
    }

    pub fn resolve_all(&self, gallery: &[SourcedMediaItem]) -> Result<Vec<ResolvedMediaItem>> {
        gallery.iter().map(|sourced| self.resolve(sourced)).collect()
    }

    /// Map a link in `provenance`'s area back to its stored filename.
    ///
    /// Anything that is not such a link (including bare filenames) comes
    /// back trimmed but otherwise unchanged.
    pub fn to_stored_name(&self, link: &str, provenance: Provenance) -> String {
        let link = link.trim();
        let Ok(parsed) = Url::parse(link) else {
            return link.to_string();
        };
        if parsed.origin() != self.base.origin() {
            return link.to_string();
        }

        let mut expected: Vec<String> = self.base_segments();
        expected.extend(self.area(provenance).iter().cloned());

        let segments: Vec<&str> = match parsed.path_segments() {
            Some(segments) => segments.collect(),
            None => return link.to_string(),
        };

        match segments.split_last() {
            Some((file, dirs)) if !file.is_empty() && dirs.iter().copied().eq(expected.iter().map(String::as_str)) => {
                urlencoding::decode(file)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| file.to_string())
            }
            _ => link.to_string(),
        }
    }

    /// Rewrite a client keep-list so absolute links match stored filenames
    pub fn normalize_keep_list(&self, keep: Vec<String>, provenance: Provenance) -> Vec<String> {
        keep.iter()
            .map(|entry| self.to_stored_name(entry, provenance))
            .collect()
    }

    fn area(&self, provenance: Provenance) -> &[String] {
        match provenance {
            Provenance::Event => &self.events_path,
            Provenance::History => &self.history_path,
        }
    }

    fn base_segments(&self) -> Vec<String> {
        self.base
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn compose(&self, area: &[String], stored_name: &str) -> Result<String> {
        let stored_name = stored_name.trim();
        if stored_name.is_empty() {
            return Err(EventDeskError::InvalidInput("Stored file name is empty".to_string()));
        }

        let mut link = self.base.clone();
        {
            let mut segments = link.path_segments_mut().map_err(|_| {
                EventDeskError::Config(format!("Storage base URL cannot be used as a base: {}", self.base))
            })?;
            segments.pop_if_empty();
            segments.extend(area.iter());
            segments.push(stored_name);
        }
        Ok(link.to_string())
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
