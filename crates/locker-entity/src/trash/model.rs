//! Deleted-document marker entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use locker_core::types::{MarkerId, UserId};

use crate::category::Category;

/// A row in `deleted_documents`. A document is in trash if and only if a
/// marker exists for its key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeletedDocument {
    /// Marker identifier.
    pub id: MarkerId,
    /// Owner of the trashed document.
    pub user_id: UserId,
    /// Object key at the time of deletion. Rows written by early clients
    /// hold only the file name.
    pub document_path: String,
    /// Display name at the time of deletion.
    pub document_name: String,
    /// When the document was moved to trash.
    pub deleted_at: DateTime<Utc>,
}

impl DeletedDocument {
    /// Final segment of the stored path.
    pub fn basename(&self) -> &str {
        self.document_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.document_path)
    }

    /// Whether the marker stores a bare file name instead of a full key.
    pub fn is_legacy(&self) -> bool {
        !self.document_path.contains('/')
    }
}

/// Data required to create a marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeletedDocument {
    /// Owner.
    pub user_id: UserId,
    /// Full object key.
    pub document_path: String,
    /// Display name.
    pub document_name: String,
}

/// A trashed document as returned by listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashedDocument {
    /// Marker identifier, used for restore and permanent delete.
    pub id: MarkerId,
    /// Stored object key.
    pub document_path: String,
    /// Display name recorded at deletion.
    pub display_name: String,
    /// Category decoded from the key.
    pub category: Category,
    /// When the document was trashed.
    pub deleted_at: DateTime<Utc>,
    /// Signed URL when the object still exists.
    pub url: Option<String>,
    /// Object size, 0 when the object is missing.
    pub size: u64,
    /// Whether the object was found in storage.
    pub available: bool,
}
