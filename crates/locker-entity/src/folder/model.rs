//! Smart folder and assignment entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use locker_core::types::{AssignmentId, SmartFolderId, UserId};

/// A row in `smart_folders`: a user-defined grouping of documents.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SmartFolder {
    /// Unique folder identifier.
    pub id: SmartFolderId,
    /// Owner.
    pub user_id: UserId,
    /// Name, unique per user.
    pub folder_name: String,
    /// Optional free-text description.
    pub folder_description: Option<String>,
    /// Keywords that hint which documents belong here.
    pub keywords: Vec<String>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a smart folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSmartFolder {
    /// Owner.
    pub user_id: UserId,
    /// Folder name.
    pub folder_name: String,
    /// Description.
    pub folder_description: Option<String>,
    /// Keywords.
    pub keywords: Vec<String>,
}

/// Partial update of a smart folder. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSmartFolder {
    /// New name.
    pub folder_name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub folder_description: Option<Option<String>>,
    /// Replacement keyword list.
    pub keywords: Option<Vec<String>>,
}

/// A row in `smart_folder_assignments`. Each document belongs to at most
/// one folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FolderAssignment {
    /// Assignment identifier.
    pub id: AssignmentId,
    /// Owner.
    pub user_id: UserId,
    /// Object key of the assigned document.
    pub document_path: String,
    /// Folder the document belongs to.
    pub folder_id: SmartFolderId,
    /// When the assignment was made.
    pub assigned_at: DateTime<Utc>,
}
