//! In-memory share links.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::{ShareId, UserId};
use locker_entity::share::{CreateDocumentShare, DocumentShare};

use crate::store::ShareStore;

/// Share table held in memory.
#[derive(Debug, Default)]
pub struct MemoryShareStore {
    rows: RwLock<Vec<DocumentShare>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a share as-is. Used to seed expired or private rows.
    pub async fn seed(&self, share: DocumentShare) {
        self.rows.write().await.push(share);
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create(&self, data: &CreateDocumentShare) -> AppResult<DocumentShare> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.share_token == data.share_token) {
            return Err(AppError::conflict("Share token collision"));
        }
        let now = Utc::now();
        let share = DocumentShare {
            id: ShareId::new(),
            user_id: data.user_id,
            document_path: data.document_path.clone(),
            share_token: data.share_token.clone(),
            is_public: data.is_public,
            expires_at: data.expires_at,
            password_hash: data.password_hash.clone(),
            allow_download: data.allow_download,
            access_count: 0,
            created_at: now,
            updated_at: now,
        };
        rows.push(share.clone());
        Ok(share)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<DocumentShare>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.share_token == token).cloned())
    }

    async fn find_by_id(&self, user_id: UserId, id: ShareId) -> AppResult<Option<DocumentShare>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DocumentShare>> {
        let rows = self.rows.read().await;
        let mut shares: Vec<DocumentShare> =
            rows.iter().filter(|r| r.user_id == user_id).cloned().collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }

    async fn delete(&self, user_id: UserId, id: ShareId) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn delete_for_document(&self, user_id: UserId, document_path: &str) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.user_id == user_id && r.document_path == document_path));
        Ok((before - rows.len()) as u64)
    }

    async fn increment_access_count(&self, id: ShareId) -> AppResult<i32> {
        let mut rows = self.rows.write().await;
        let share = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} not found")))?;
        share.access_count += 1;
        share.updated_at = Utc::now();
        Ok(share.access_count)
    }

    async fn update_document_path(&self, user_id: UserId, from: &str, to: &str) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let mut moved = 0;
        for share in rows
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.document_path == from)
        {
            share.document_path = to.to_string();
            share.updated_at = Utc::now();
            moved += 1;
        }
        Ok(moved)
    }
}
