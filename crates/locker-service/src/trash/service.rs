//! Trash service: move to trash, restore, permanent delete, and purge.
//!
//! Moving a document to trash only writes a marker row; the object stays
//! where it is. Permanent deletion removes the marker first and the object
//! afterwards, best effort.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::traits::storage::{StorageObjectMeta, StorageProvider};
use locker_core::types::{MarkerId, Outcome, UserId};
use locker_database::store::{FolderStore, ShareStore, TrashStore};
use locker_entity::document::DocumentPath;
use locker_entity::trash::{CreateDeletedDocument, DeletedDocument, TrashedDocument};

use crate::context::RequestContext;
use crate::document::reconcile::TrashIndex;
use crate::document::owned_path;

/// Result of a purge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeSummary {
    /// Markers older than this were purged.
    pub cutoff: DateTime<Utc>,
    /// Number of markers removed.
    pub purged: u64,
    /// Number of objects handed to the bulk delete.
    pub objects_removed: usize,
}

/// Manages the user's trash.
#[derive(Debug, Clone)]
pub struct TrashService {
    storage: Arc<dyn StorageProvider>,
    trash_store: Arc<dyn TrashStore>,
    share_store: Arc<dyn ShareStore>,
    folder_store: Arc<dyn FolderStore>,
    signed_url_ttl: Duration,
    retention_days: u32,
}

impl TrashService {
    /// Creates a new trash service.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        trash_store: Arc<dyn TrashStore>,
        share_store: Arc<dyn ShareStore>,
        folder_store: Arc<dyn FolderStore>,
        signed_url_ttl: Duration,
        retention_days: u32,
    ) -> Self {
        Self {
            storage,
            trash_store,
            share_store,
            folder_store,
            signed_url_ttl,
            retention_days,
        }
    }

    /// Index of the user's markers.
    pub async fn index(&self, user_id: UserId) -> AppResult<TrashIndex> {
        let markers = self.trash_store.list_for_user(user_id).await?;
        Ok(TrashIndex::new(&markers))
    }

    /// Whether `path` is covered by one of the user's markers.
    pub async fn is_trashed(&self, user_id: UserId, path: &str) -> AppResult<bool> {
        Ok(self.index(user_id).await?.contains(path))
    }

    /// Lists trashed documents, newest first, with their object status.
    pub async fn list_trashed(&self, ctx: &RequestContext) -> AppResult<Vec<TrashedDocument>> {
        let markers = self.trash_store.list_for_user(ctx.user_id).await?;
        let mut documents = Vec::with_capacity(markers.len());

        for marker in markers {
            let decoded = DocumentPath::parse(&marker.document_path)
                .or_else(|_| DocumentPath::parse(&fallback_key(ctx.user_id, &marker)))
                .ok();
            let located = self.locate(ctx.user_id, &marker).await?;

            let (url, size) = match &located {
                Some(object) => (
                    Some(
                        self.storage
                            .signed_url(&object.path, self.signed_url_ttl)
                            .await?,
                    ),
                    object.size_bytes,
                ),
                None => (None, 0),
            };

            documents.push(TrashedDocument {
                id: marker.id,
                display_name: decoded
                    .as_ref()
                    .map(DocumentPath::display_name)
                    .unwrap_or_else(|| marker.document_name.clone()),
                category: decoded
                    .as_ref()
                    .map(|p| p.category().clone())
                    .unwrap_or_default(),
                document_path: marker.document_path,
                deleted_at: marker.deleted_at,
                url,
                size,
                available: located.is_some(),
            });
        }

        Ok(documents)
    }

    /// Marks a document as trashed. The object is not touched.
    pub async fn move_to_trash(
        &self,
        ctx: &RequestContext,
        raw_path: &str,
    ) -> AppResult<DeletedDocument> {
        let path = owned_path(ctx, raw_path)?;
        if path.is_private() {
            return Err(AppError::validation(
                "Private documents are deleted permanently, not moved to trash",
            ));
        }
        if self.is_trashed(ctx.user_id, path.as_str()).await? {
            return Err(AppError::conflict(format!(
                "Document '{}' is already in trash",
                path.as_str()
            )));
        }
        if !self.storage.exists(path.as_str()).await? {
            return Err(AppError::not_found(format!(
                "Document '{}' not found",
                path.as_str()
            )));
        }

        let marker = self
            .trash_store
            .insert(&CreateDeletedDocument {
                user_id: ctx.user_id,
                document_path: path.as_str().to_string(),
                document_name: path.display_name(),
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            marker_id = %marker.id,
            path = %marker.document_path,
            "Document moved to trash"
        );

        Ok(marker)
    }

    /// Restores a trashed document by removing its marker.
    pub async fn restore(&self, ctx: &RequestContext, id: MarkerId) -> AppResult<()> {
        if !self.trash_store.delete(ctx.user_id, id).await? {
            return Err(AppError::not_found(format!("Trash entry {id} not found")));
        }
        info!(user_id = %ctx.user_id, marker_id = %id, "Document restored from trash");
        Ok(())
    }

    /// Removes the marker, then the object and anything referencing it.
    ///
    /// Only the marker removal can fail the call; object and reference
    /// cleanup failures are reported as advisories.
    pub async fn permanently_delete(
        &self,
        ctx: &RequestContext,
        id: MarkerId,
    ) -> AppResult<Outcome<DeletedDocument>> {
        let marker = self
            .trash_store
            .find_by_id(ctx.user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trash entry {id} not found")))?;

        if !self.trash_store.delete(ctx.user_id, id).await? {
            return Err(AppError::not_found(format!("Trash entry {id} not found")));
        }

        let mut outcome = Outcome::clean(());
        match self.locate(ctx.user_id, &marker).await {
            Ok(Some(object)) => {
                if let Err(e) = self.storage.delete(&object.path).await {
                    outcome.advise("storage.delete", e.to_string());
                }
                self.forget_references(ctx.user_id, &object.path, &mut outcome)
                    .await;
            }
            Ok(None) => {
                self.forget_references(ctx.user_id, &marker.document_path, &mut outcome)
                    .await;
            }
            Err(e) => outcome.advise("storage.locate", e.to_string()),
        }

        info!(
            user_id = %ctx.user_id,
            marker_id = %id,
            path = %marker.document_path,
            advisories = outcome.advisories.len(),
            "Document permanently deleted"
        );

        Ok(outcome.map(|()| marker))
    }

    /// Permanently deletes every marker older than `days` (default: the
    /// configured retention).
    pub async fn purge(
        &self,
        ctx: &RequestContext,
        days: Option<u32>,
    ) -> AppResult<Outcome<PurgeSummary>> {
        let days = days.unwrap_or(self.retention_days);
        let cutoff = ctx.request_time - chrono::Duration::days(i64::from(days));
        let markers = self.trash_store.list_older_than(ctx.user_id, cutoff).await?;

        let mut outcome = Outcome::clean(());
        if markers.is_empty() {
            return Ok(outcome.map(|()| PurgeSummary {
                cutoff,
                purged: 0,
                objects_removed: 0,
            }));
        }

        let mut keys = Vec::with_capacity(markers.len());
        for marker in &markers {
            match self.locate(ctx.user_id, marker).await {
                Ok(Some(object)) => keys.push(object.path),
                Ok(None) => {}
                Err(e) => outcome.advise("storage.locate", e.to_string()),
            }
        }

        let objects_removed = keys.len();
        if !keys.is_empty() {
            if let Err(e) = self.storage.delete_many(&keys).await {
                outcome.advise("storage.delete_many", e.to_string());
            }
        }
        for marker in &markers {
            self.forget_references(ctx.user_id, &marker.document_path, &mut outcome)
                .await;
        }

        let ids: Vec<MarkerId> = markers.iter().map(|m| m.id).collect();
        let purged = self.trash_store.delete_many(ctx.user_id, &ids).await?;

        info!(
            user_id = %ctx.user_id,
            days,
            purged,
            objects_removed,
            "Trash purged"
        );

        Ok(outcome.map(|()| PurgeSummary {
            cutoff,
            purged,
            objects_removed,
        }))
    }

    /// Find the object a marker refers to: the stored key first, then the
    /// flat `{user}/{basename}` key older markers point at.
    async fn locate(
        &self,
        user_id: UserId,
        marker: &DeletedDocument,
    ) -> AppResult<Option<StorageObjectMeta>> {
        let stored = marker.document_path.trim_start_matches('/').to_string();
        let fallback = fallback_key(user_id, marker);
        let candidates = if marker.is_legacy() || stored == fallback {
            vec![fallback]
        } else {
            vec![stored, fallback]
        };

        for key in candidates {
            match self.storage.metadata(&key).await {
                Ok(object) => return Ok(Some(object)),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Drop shares and the folder assignment pointing at `path`.
    pub(crate) async fn forget_references(
        &self,
        user_id: UserId,
        path: &str,
        outcome: &mut Outcome<()>,
    ) {
        if let Err(e) = self.share_store.delete_for_document(user_id, path).await {
            outcome.advise("shares.delete", e.to_string());
        }
        if let Err(e) = self.folder_store.remove_assignment(user_id, path).await {
            outcome.advise("folders.unassign", e.to_string());
        }
    }
}

fn fallback_key(user_id: UserId, marker: &DeletedDocument) -> String {
    format!("{user_id}/{}", marker.basename())
}
