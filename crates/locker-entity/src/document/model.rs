//! Active document view model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::document::path::DocumentPath;

/// An active (not trashed) document as returned by listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Human-readable name derived from the key.
    pub display_name: String,
    /// The raw object key.
    pub path: String,
    /// Signed content URL. `None` for private documents unless the caller
    /// holds a private-access grant.
    pub url: Option<String>,
    /// Object size in bytes.
    pub size: u64,
    /// Category decoded from the key.
    pub category: Category,
    /// Whether the document is under the private prefix.
    pub is_private: bool,
    /// Upload time decoded from the key.
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl DocumentEntry {
    /// Build an entry from a decoded key.
    pub fn from_path(path: &DocumentPath, size: u64, url: Option<String>) -> Self {
        Self {
            display_name: path.display_name(),
            path: path.as_str().to_string(),
            url,
            size,
            category: path.category().clone(),
            is_private: path.is_private(),
            uploaded_at: path.uploaded_at(),
        }
    }
}
