//! Document share repository.

use async_trait::async_trait;
use sqlx::PgPool;

use locker_core::error::{AppError, ErrorKind};
use locker_core::result::AppResult;
use locker_core::types::{ShareId, UserId};
use locker_entity::share::{CreateDocumentShare, DocumentShare};

use crate::store::ShareStore;

/// Repository over `document_shares`.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn create(&self, data: &CreateDocumentShare) -> AppResult<DocumentShare> {
        sqlx::query_as::<_, DocumentShare>(
            "INSERT INTO document_shares (id, user_id, document_path, share_token, is_public, \
             expires_at, password_hash, allow_download) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(ShareId::new())
        .bind(data.user_id)
        .bind(&data.document_path)
        .bind(&data.share_token)
        .bind(data.is_public)
        .bind(data.expires_at)
        .bind(&data.password_hash)
        .bind(data.allow_download)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("document_shares_share_token_key") =>
            {
                AppError::conflict("Share token collision")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create share", e),
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<DocumentShare>> {
        sqlx::query_as::<_, DocumentShare>("SELECT * FROM document_shares WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share by token", e)
            })
    }

    async fn find_by_id(&self, user_id: UserId, id: ShareId) -> AppResult<Option<DocumentShare>> {
        sqlx::query_as::<_, DocumentShare>(
            "SELECT * FROM document_shares WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DocumentShare>> {
        sqlx::query_as::<_, DocumentShare>(
            "SELECT * FROM document_shares WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    async fn delete(&self, user_id: UserId, id: ShareId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM document_shares WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_document(&self, user_id: UserId, document_path: &str) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM document_shares WHERE user_id = $1 AND document_path = $2")
                .bind(user_id)
                .bind(document_path)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete shares", e)
                })?;
        Ok(result.rows_affected())
    }

    async fn increment_access_count(&self, id: ShareId) -> AppResult<i32> {
        let row: (i32,) = sqlx::query_as(
            "UPDATE document_shares SET access_count = access_count + 1, updated_at = NOW() \
             WHERE id = $1 RETURNING access_count",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment access count", e)
        })?;
        Ok(row.0)
    }

    async fn update_document_path(&self, user_id: UserId, from: &str, to: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE document_shares SET document_path = $3, updated_at = NOW() \
             WHERE user_id = $1 AND document_path = $2",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move shares", e))?;
        Ok(result.rows_affected())
    }
}
