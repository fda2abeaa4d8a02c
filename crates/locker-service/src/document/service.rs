//! Document service: reconciles the object store with the user's
//! deletion markers and implements the operations on active documents.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use locker_core::config::StorageConfig;
use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::traits::storage::StorageProvider;
use locker_core::types::{MarkerId, Outcome};
use locker_database::store::{FolderStore, ShareStore};
use locker_entity::category::Category;
use locker_entity::document::{DocumentEntry, DocumentPath};

use super::owned_path;
use super::reconcile::{is_legacy_trash_name, is_placeholder};
use crate::context::RequestContext;
use crate::trash::TrashService;

/// An upload as received from the client.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    /// Original file name.
    pub file_name: String,
    /// Requested category.
    pub category: Category,
    /// Store under the private prefix.
    pub is_private: bool,
    /// File content.
    pub data: Bytes,
}

/// What deleting a document did.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletionKind {
    /// A marker was written; the document can be restored.
    Trashed {
        /// The new marker.
        marker_id: MarkerId,
    },
    /// The object was removed immediately.
    Removed,
}

/// Operations on the user's active documents.
#[derive(Debug, Clone)]
pub struct DocumentService {
    storage: Arc<dyn StorageProvider>,
    share_store: Arc<dyn ShareStore>,
    folder_store: Arc<dyn FolderStore>,
    trash: Arc<TrashService>,
    max_upload_size: u64,
    signed_url_ttl: Duration,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        share_store: Arc<dyn ShareStore>,
        folder_store: Arc<dyn FolderStore>,
        trash: Arc<TrashService>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            storage,
            share_store,
            folder_store,
            trash,
            max_upload_size: config.max_upload_size_bytes,
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_seconds),
        }
    }

    /// Lists the user's active documents in storage listing order.
    ///
    /// Placeholders, legacy trash names and anything covered by a marker
    /// are skipped. Private entries get a URL only when the request holds
    /// a private-access grant.
    pub async fn list_active(&self, ctx: &RequestContext) -> AppResult<Vec<DocumentEntry>> {
        let index = self.trash.index(ctx.user_id).await?;
        let unlocked = ctx.has_private_access();

        let mut listing = self.storage.list(&ctx.user_id.to_string()).await?;
        listing.extend(
            self.storage
                .list(&format!("{}/private", ctx.user_id))
                .await?,
        );

        let mut entries = Vec::new();
        for object in listing {
            if is_placeholder(&object) || is_legacy_trash_name(&object.path) {
                continue;
            }
            if index.contains(&object.path) {
                continue;
            }
            let path = match DocumentPath::parse(&object.path) {
                Ok(path) => path,
                Err(e) => {
                    debug!(path = %object.path, error = %e, "Skipping undecodable key");
                    continue;
                }
            };

            let url = if path.requires_private_access() && !unlocked {
                None
            } else {
                Some(self.sign(&path).await?)
            };
            entries.push(DocumentEntry::from_path(&path, object.size_bytes, url));
        }

        Ok(entries)
    }

    /// Stores a new document under a key encoding its category and
    /// upload time.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        upload: UploadDocument,
    ) -> AppResult<DocumentEntry> {
        if upload.data.is_empty() {
            return Err(AppError::validation("File is empty"));
        }
        if upload.file_name.trim().is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        let size = upload.data.len() as u64;
        if size > self.max_upload_size {
            return Err(AppError::payload_too_large(format!(
                "File size {size} exceeds maximum {}",
                self.max_upload_size
            )));
        }
        if upload.category.is_private() && !upload.is_private {
            return Err(AppError::validation(
                "The private category is only for documents uploaded as private",
            ));
        }
        if upload.is_private {
            ctx.require_private_access()?;
        }

        let path = DocumentPath::compose(
            &ctx.user_id,
            upload.is_private,
            ctx.request_time.timestamp_millis(),
            &upload.category,
            &upload.file_name,
        )?;

        self.storage.write(path.as_str(), upload.data).await?;

        info!(
            user_id = %ctx.user_id,
            path = %path,
            category = %path.category(),
            size,
            "Document uploaded"
        );

        let url = self.sign(&path).await?;
        Ok(DocumentEntry::from_path(&path, size, Some(url)))
    }

    /// Signed download URL for an active document.
    pub async fn document_url(&self, ctx: &RequestContext, raw_path: &str) -> AppResult<String> {
        let path = self.ensure_active(ctx, raw_path).await?;
        if path.requires_private_access() {
            ctx.require_private_access()?;
        }
        self.sign(&path).await
    }

    /// Moves a document to another category by renaming its object, then
    /// carries shares and the folder assignment over to the new key.
    pub async fn recategorize(
        &self,
        ctx: &RequestContext,
        raw_path: &str,
        category: &Category,
    ) -> AppResult<Outcome<DocumentEntry>> {
        let path = self.ensure_active(ctx, raw_path).await?;
        if path.is_private() {
            return Err(AppError::validation(
                "Private documents cannot be recategorized",
            ));
        }
        if path.requires_private_access() {
            ctx.require_private_access()?;
        }
        if category.is_private() {
            return Err(AppError::validation(
                "Documents cannot be moved into the private category",
            ));
        }

        let target = path.with_category(category, Utc::now().timestamp_millis())?;
        if target == path {
            let size = self.storage.metadata(path.as_str()).await?.size_bytes;
            let url = self.sign(&path).await?;
            return Ok(Outcome::clean(DocumentEntry::from_path(&path, size, Some(url))));
        }
        if self.storage.exists(target.as_str()).await? {
            return Err(AppError::conflict(format!(
                "Document '{}' already exists",
                target.as_str()
            )));
        }

        self.storage.rename(path.as_str(), target.as_str()).await?;

        let mut outcome = Outcome::clean(());
        if let Err(e) = self
            .share_store
            .update_document_path(ctx.user_id, path.as_str(), target.as_str())
            .await
        {
            outcome.advise("shares.move", e.to_string());
        }
        if let Err(e) = self
            .folder_store
            .update_assignment_path(ctx.user_id, path.as_str(), target.as_str())
            .await
        {
            outcome.advise("folders.move", e.to_string());
        }

        info!(
            user_id = %ctx.user_id,
            from = %path,
            to = %target,
            category = %category,
            "Document recategorized"
        );

        let size = self.storage.metadata(target.as_str()).await?.size_bytes;
        let url = self.sign(&target).await?;
        Ok(outcome.map(|()| DocumentEntry::from_path(&target, size, Some(url))))
    }

    /// Deletes a document: private documents are removed immediately,
    /// everything else goes to trash.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        raw_path: &str,
    ) -> AppResult<Outcome<DeletionKind>> {
        let path = owned_path(ctx, raw_path)?;
        if !path.is_private() {
            let marker = self.trash.move_to_trash(ctx, raw_path).await?;
            return Ok(Outcome::clean(DeletionKind::Trashed {
                marker_id: marker.id,
            }));
        }

        ctx.require_private_access()?;
        if !self.storage.exists(path.as_str()).await? {
            return Err(AppError::not_found(format!(
                "Document '{}' not found",
                path.as_str()
            )));
        }
        self.storage.delete(path.as_str()).await?;

        let mut outcome = Outcome::clean(());
        self.trash
            .forget_references(ctx.user_id, path.as_str(), &mut outcome)
            .await;

        info!(user_id = %ctx.user_id, path = %path, "Private document removed");

        Ok(outcome.map(|()| DeletionKind::Removed))
    }

    /// Decode, check ownership, check the document is not trashed and
    /// still exists.
    pub async fn ensure_active(
        &self,
        ctx: &RequestContext,
        raw_path: &str,
    ) -> AppResult<DocumentPath> {
        let path = owned_path(ctx, raw_path)?;
        if self.trash.is_trashed(ctx.user_id, path.as_str()).await? {
            return Err(AppError::conflict(format!(
                "Document '{}' is in trash",
                path.as_str()
            )));
        }
        if !self.storage.exists(path.as_str()).await? {
            return Err(AppError::not_found(format!(
                "Document '{}' not found",
                path.as_str()
            )));
        }
        Ok(path)
    }

    async fn sign(&self, path: &DocumentPath) -> AppResult<String> {
        self.storage
            .signed_url(path.as_str(), self.signed_url_ttl)
            .await
    }
}
