//! Async store traits over the metadata tables.
//!
//! Every method that takes a `user_id` scopes its query to that user; the
//! public token lookup on [`ShareStore`] is the only unscoped read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use locker_core::result::AppResult;
use locker_core::types::{MarkerId, ShareId, SmartFolderId, UserId};
use locker_entity::folder::{CreateSmartFolder, FolderAssignment, SmartFolder, UpdateSmartFolder};
use locker_entity::share::{CreateDocumentShare, DocumentShare};
use locker_entity::trash::{CreateDeletedDocument, DeletedDocument};

/// Deleted-document markers.
#[async_trait]
pub trait TrashStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a marker. A second marker for the same `(user, path)` fails
    /// with a conflict error.
    async fn insert(&self, data: &CreateDeletedDocument) -> AppResult<DeletedDocument>;

    /// Find a marker by id.
    async fn find_by_id(&self, user_id: UserId, id: MarkerId) -> AppResult<Option<DeletedDocument>>;

    /// All markers of a user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DeletedDocument>>;

    /// Markers deleted strictly before `cutoff`.
    async fn list_older_than(
        &self,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<DeletedDocument>>;

    /// Delete a marker. Returns whether a row was removed.
    async fn delete(&self, user_id: UserId, id: MarkerId) -> AppResult<bool>;

    /// Delete several markers. Returns the number of rows removed.
    async fn delete_many(&self, user_id: UserId, ids: &[MarkerId]) -> AppResult<u64>;
}

/// Public document shares.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a share.
    async fn create(&self, data: &CreateDocumentShare) -> AppResult<DocumentShare>;

    /// Look a share up by its public token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<DocumentShare>>;

    /// Find a share by id.
    async fn find_by_id(&self, user_id: UserId, id: ShareId) -> AppResult<Option<DocumentShare>>;

    /// All shares of a user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DocumentShare>>;

    /// Delete a share. Returns whether a row was removed.
    async fn delete(&self, user_id: UserId, id: ShareId) -> AppResult<bool>;

    /// Delete every share of one document.
    async fn delete_for_document(&self, user_id: UserId, document_path: &str) -> AppResult<u64>;

    /// Increment the access counter and return the new value.
    async fn increment_access_count(&self, id: ShareId) -> AppResult<i32>;

    /// Point shares of `from` at `to` after the object was renamed.
    async fn update_document_path(&self, user_id: UserId, from: &str, to: &str) -> AppResult<u64>;
}

/// Smart folders and their document assignments.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a folder. A duplicate name for the same user fails with a
    /// conflict error.
    async fn create(&self, data: &CreateSmartFolder) -> AppResult<SmartFolder>;

    /// Find a folder by id.
    async fn find_by_id(&self, user_id: UserId, id: SmartFolderId)
    -> AppResult<Option<SmartFolder>>;

    /// Find a folder by exact name.
    async fn find_by_name(&self, user_id: UserId, name: &str) -> AppResult<Option<SmartFolder>>;

    /// All folders of a user ordered by name.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SmartFolder>>;

    /// Apply a partial update. Returns `None` when the folder does not exist.
    async fn update(
        &self,
        user_id: UserId,
        id: SmartFolderId,
        data: &UpdateSmartFolder,
    ) -> AppResult<Option<SmartFolder>>;

    /// Delete a folder and its assignments.
    async fn delete(&self, user_id: UserId, id: SmartFolderId) -> AppResult<bool>;

    /// Assign a document to a folder, replacing any previous assignment.
    async fn upsert_assignment(
        &self,
        user_id: UserId,
        document_path: &str,
        folder_id: SmartFolderId,
    ) -> AppResult<FolderAssignment>;

    /// Remove a document's assignment.
    async fn remove_assignment(&self, user_id: UserId, document_path: &str) -> AppResult<bool>;

    /// Assignment of one document.
    async fn find_assignment(
        &self,
        user_id: UserId,
        document_path: &str,
    ) -> AppResult<Option<FolderAssignment>>;

    /// Assignments of a user, optionally restricted to one folder.
    async fn list_assignments(
        &self,
        user_id: UserId,
        folder_id: Option<SmartFolderId>,
    ) -> AppResult<Vec<FolderAssignment>>;

    /// Point the assignment of `from` at `to` after the object was renamed.
    async fn update_assignment_path(&self, user_id: UserId, from: &str, to: &str)
    -> AppResult<u64>;
}
