//! Reconciliation layer
//!
//! Pure functions that turn loosely-typed document and media fields into
//! canonical values: the compliance view of a registrant's documents and
//! the ordered, deduplicated media gallery of an event. No I/O happens here
//! and nothing in this module returns an error; unreadable input degrades
//! to empty collections.

pub mod parser;
pub mod checklist;
pub mod gallery;

pub use parser::{RawField, parse_list_field, parse_media_field, parse_keep_list, unreadable_list_elements, unreadable_media_elements};
pub use checklist::{build_compliance_view, compute_compliance, normalize_required_documents, parse_uploaded_documents, unreadable_uploaded_documents};
pub use gallery::{GalleryMerge, merge_gallery, merge_gallery_detailed, assemble_gallery, gallery_to_value};
