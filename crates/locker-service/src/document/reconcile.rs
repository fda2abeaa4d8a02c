//! Filters that turn a raw storage listing into the set of active
//! documents.

use std::collections::HashSet;

use locker_core::traits::storage::StorageObjectMeta;
use locker_entity::document::path::PRIVATE_SEGMENT;
use locker_entity::trash::DeletedDocument;

/// File-name prefixes older clients used to mark an object as trashed.
const LEGACY_TRASH_PREFIXES: &[&str] = &["deleted_", ".trash"];
/// Path segment older clients moved trashed objects under.
const LEGACY_TRASH_SEGMENT: &str = "trash";

/// Whether a listing entry is a folder placeholder rather than a document.
///
/// Directories, zero-byte objects, dot-files and names without an
/// extension are all placeholders.
pub fn is_placeholder(object: &StorageObjectMeta) -> bool {
    if object.is_directory || object.size_bytes == 0 {
        return true;
    }
    let name = object.file_name();
    if name.starts_with('.') {
        return true;
    }
    !matches!(name.rsplit_once('.'), Some((stem, ext)) if !stem.is_empty() && !ext.is_empty())
}

/// Whether the key uses one of the legacy trash naming schemes.
pub fn is_legacy_trash_name(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    if LEGACY_TRASH_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return true;
    }
    path.split('/')
        .rev()
        .skip(1)
        .any(|segment| segment == LEGACY_TRASH_SEGMENT)
}

/// Whether `key` has the shape `{owner}/private/...`. Legacy markers
/// predate the private prefix and never refer to keys under it.
fn is_under_private_prefix(key: &str) -> bool {
    let mut segments = key.split('/');
    segments.next();
    segments.next() == Some(PRIVATE_SEGMENT) && segments.next().is_some()
}

/// Lookup over a user's deletion markers.
///
/// Markers normally hold the full object key. Markers written by older
/// clients hold only the file name and match any non-private key ending
/// in it.
#[derive(Debug, Default)]
pub struct TrashIndex {
    paths: HashSet<String>,
    legacy_names: HashSet<String>,
}

impl TrashIndex {
    /// Build the index from marker rows.
    pub fn new(markers: &[DeletedDocument]) -> Self {
        let mut index = Self::default();
        for marker in markers {
            if marker.is_legacy() {
                index.legacy_names.insert(marker.document_path.clone());
            } else {
                index
                    .paths
                    .insert(marker.document_path.trim_start_matches('/').to_string());
            }
        }
        index
    }

    /// Whether `path` is covered by a marker.
    pub fn contains(&self, path: &str) -> bool {
        let key = path.trim_start_matches('/');
        if self.paths.contains(key) {
            return true;
        }
        if is_under_private_prefix(key) {
            return false;
        }
        let name = key.rsplit('/').next().unwrap_or(key);
        self.legacy_names.contains(name)
    }

    /// Number of markers indexed.
    pub fn len(&self) -> usize {
        self.paths.len() + self.legacy_names.len()
    }

    /// Whether no markers are indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
