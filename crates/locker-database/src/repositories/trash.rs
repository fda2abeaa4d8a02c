//! Deleted-document marker repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use locker_core::error::{AppError, ErrorKind};
use locker_core::result::AppResult;
use locker_core::types::{MarkerId, UserId};
use locker_entity::trash::{CreateDeletedDocument, DeletedDocument};

use crate::store::TrashStore;

/// Repository over `deleted_documents`.
#[derive(Debug, Clone)]
pub struct TrashRepository {
    pool: PgPool,
}

impl TrashRepository {
    /// Create a new trash repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrashStore for TrashRepository {
    async fn insert(&self, data: &CreateDeletedDocument) -> AppResult<DeletedDocument> {
        sqlx::query_as::<_, DeletedDocument>(
            "INSERT INTO deleted_documents (id, user_id, document_path, document_name) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(MarkerId::new())
        .bind(data.user_id)
        .bind(&data.document_path)
        .bind(&data.document_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("deleted_documents_user_id_document_path_key") =>
            {
                AppError::conflict(format!(
                    "Document '{}' is already in trash",
                    data.document_path
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert trash marker", e),
        })
    }

    async fn find_by_id(&self, user_id: UserId, id: MarkerId) -> AppResult<Option<DeletedDocument>> {
        sqlx::query_as::<_, DeletedDocument>(
            "SELECT * FROM deleted_documents WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find trash marker", e))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DeletedDocument>> {
        sqlx::query_as::<_, DeletedDocument>(
            "SELECT * FROM deleted_documents WHERE user_id = $1 ORDER BY deleted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list trash", e))
    }

    async fn list_older_than(
        &self,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<DeletedDocument>> {
        sqlx::query_as::<_, DeletedDocument>(
            "SELECT * FROM deleted_documents WHERE user_id = $1 AND deleted_at < $2 \
             ORDER BY deleted_at",
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list expired trash", e))
    }

    async fn delete(&self, user_id: UserId, id: MarkerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM deleted_documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete trash marker", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, user_id: UserId, ids: &[MarkerId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let result =
            sqlx::query("DELETE FROM deleted_documents WHERE user_id = $1 AND id = ANY($2)")
                .bind(user_id)
                .bind(&ids)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge trash markers", e)
                })?;
        Ok(result.rows_affected())
    }
}
