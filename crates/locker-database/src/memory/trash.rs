//! In-memory deleted-document markers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::{MarkerId, UserId};
use locker_entity::trash::{CreateDeletedDocument, DeletedDocument};

use crate::store::TrashStore;

/// Marker table held in memory.
#[derive(Debug, Default)]
pub struct MemoryTrashStore {
    rows: RwLock<Vec<DeletedDocument>>,
}

impl MemoryTrashStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a marker as-is, bypassing uniqueness checks. Used to seed
    /// legacy or back-dated rows.
    pub async fn seed(&self, marker: DeletedDocument) {
        self.rows.write().await.push(marker);
    }
}

#[async_trait]
impl TrashStore for MemoryTrashStore {
    async fn insert(&self, data: &CreateDeletedDocument) -> AppResult<DeletedDocument> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|r| r.user_id == data.user_id && r.document_path == data.document_path)
        {
            return Err(AppError::conflict(format!(
                "Document '{}' is already in trash",
                data.document_path
            )));
        }
        let marker = DeletedDocument {
            id: MarkerId::new(),
            user_id: data.user_id,
            document_path: data.document_path.clone(),
            document_name: data.document_name.clone(),
            deleted_at: Utc::now(),
        };
        rows.push(marker.clone());
        Ok(marker)
    }

    async fn find_by_id(&self, user_id: UserId, id: MarkerId) -> AppResult<Option<DeletedDocument>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DeletedDocument>> {
        let rows = self.rows.read().await;
        let mut markers: Vec<DeletedDocument> =
            rows.iter().filter(|r| r.user_id == user_id).cloned().collect();
        markers.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(markers)
    }

    async fn list_older_than(
        &self,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<DeletedDocument>> {
        let rows = self.rows.read().await;
        let mut markers: Vec<DeletedDocument> = rows
            .iter()
            .filter(|r| r.user_id == user_id && r.deleted_at < cutoff)
            .cloned()
            .collect();
        markers.sort_by(|a, b| a.deleted_at.cmp(&b.deleted_at));
        Ok(markers)
    }

    async fn delete(&self, user_id: UserId, id: MarkerId) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn delete_many(&self, user_id: UserId, ids: &[MarkerId]) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.user_id == user_id && ids.contains(&r.id)));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(user_id: UserId, path: &str) -> CreateDeletedDocument {
        CreateDeletedDocument {
            user_id,
            document_path: path.to_string(),
            document_name: "doc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_marker_conflicts() {
        let store = MemoryTrashStore::new();
        let user = UserId::new();
        store.insert(&marker(user, "u/a.pdf")).await.unwrap();
        let err = store.insert(&marker(user, "u/a.pdf")).await.unwrap_err();
        assert_eq!(err.kind, locker_core::error::ErrorKind::Conflict);

        // Same path for another user is a different row.
        store.insert(&marker(UserId::new(), "u/a.pdf")).await.unwrap();
    }

    #[tokio::test]
    async fn test_queries_are_user_scoped() {
        let store = MemoryTrashStore::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let row = store.insert(&marker(alice, "a/1.pdf")).await.unwrap();

        assert!(store.find_by_id(bob, row.id).await.unwrap().is_none());
        assert!(!store.delete(bob, row.id).await.unwrap());
        assert!(store.list_for_user(bob).await.unwrap().is_empty());
        assert!(store.delete(alice, row.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_older_than_is_strict() {
        let store = MemoryTrashStore::new();
        let user = UserId::new();
        let row = store.insert(&marker(user, "u/a.pdf")).await.unwrap();
        assert!(store.list_older_than(user, row.deleted_at).await.unwrap().is_empty());
        let later = row.deleted_at + chrono::Duration::seconds(1);
        assert_eq!(store.list_older_than(user, later).await.unwrap().len(), 1);
    }
}
