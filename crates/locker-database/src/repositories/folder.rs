//! Smart folder and assignment repository.

use async_trait::async_trait;
use sqlx::PgPool;

use locker_core::error::{AppError, ErrorKind};
use locker_core::result::AppResult;
use locker_core::types::{AssignmentId, SmartFolderId, UserId};
use locker_entity::folder::{CreateSmartFolder, FolderAssignment, SmartFolder, UpdateSmartFolder};

use crate::store::FolderStore;

const FOLDER_NAME_KEY: &str = "smart_folders_user_id_folder_name_key";
const ASSIGNMENT_FOLDER_FKEY: &str = "smart_folder_assignments_folder_id_fkey";

/// Repository over `smart_folders` and `smart_folder_assignments`.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn create(&self, data: &CreateSmartFolder) -> AppResult<SmartFolder> {
        sqlx::query_as::<_, SmartFolder>(
            "INSERT INTO smart_folders (id, user_id, folder_name, folder_description, keywords) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(SmartFolderId::new())
        .bind(data.user_id)
        .bind(&data.folder_name)
        .bind(&data.folder_description)
        .bind(&data.keywords)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(FOLDER_NAME_KEY) => {
                AppError::conflict(format!("Folder '{}' already exists", data.folder_name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
        id: SmartFolderId,
    ) -> AppResult<Option<SmartFolder>> {
        sqlx::query_as::<_, SmartFolder>(
            "SELECT * FROM smart_folders WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_name(&self, user_id: UserId, name: &str) -> AppResult<Option<SmartFolder>> {
        sqlx::query_as::<_, SmartFolder>(
            "SELECT * FROM smart_folders WHERE user_id = $1 AND folder_name = $2",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
        })
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SmartFolder>> {
        sqlx::query_as::<_, SmartFolder>(
            "SELECT * FROM smart_folders WHERE user_id = $1 ORDER BY folder_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn update(
        &self,
        user_id: UserId,
        id: SmartFolderId,
        data: &UpdateSmartFolder,
    ) -> AppResult<Option<SmartFolder>> {
        let (set_description, description) = match &data.folder_description {
            Some(description) => (true, description.clone()),
            None => (false, None),
        };

        sqlx::query_as::<_, SmartFolder>(
            "UPDATE smart_folders SET \
             folder_name = COALESCE($3, folder_name), \
             folder_description = CASE WHEN $4 THEN $5 ELSE folder_description END, \
             keywords = COALESCE($6, keywords), \
             updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(data.folder_name.as_deref())
        .bind(set_description)
        .bind(description)
        .bind(data.keywords.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(FOLDER_NAME_KEY) => {
                AppError::conflict(format!(
                    "Folder '{}' already exists",
                    data.folder_name.as_deref().unwrap_or_default()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update folder", e),
        })
    }

    async fn delete(&self, user_id: UserId, id: SmartFolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM smart_folders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_assignment(
        &self,
        user_id: UserId,
        document_path: &str,
        folder_id: SmartFolderId,
    ) -> AppResult<FolderAssignment> {
        sqlx::query_as::<_, FolderAssignment>(
            "INSERT INTO smart_folder_assignments (id, user_id, document_path, folder_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, document_path) \
             DO UPDATE SET folder_id = EXCLUDED.folder_id, assigned_at = NOW() \
             RETURNING *",
        )
        .bind(AssignmentId::new())
        .bind(user_id)
        .bind(document_path)
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(ASSIGNMENT_FOLDER_FKEY) =>
            {
                AppError::not_found(format!("Folder {folder_id} not found"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to assign document", e),
        })
    }

    async fn remove_assignment(&self, user_id: UserId, document_path: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM smart_folder_assignments WHERE user_id = $1 AND document_path = $2",
        )
        .bind(user_id)
        .bind(document_path)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unassign document", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_assignment(
        &self,
        user_id: UserId,
        document_path: &str,
    ) -> AppResult<Option<FolderAssignment>> {
        sqlx::query_as::<_, FolderAssignment>(
            "SELECT * FROM smart_folder_assignments WHERE user_id = $1 AND document_path = $2",
        )
        .bind(user_id)
        .bind(document_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find assignment", e))
    }

    async fn list_assignments(
        &self,
        user_id: UserId,
        folder_id: Option<SmartFolderId>,
    ) -> AppResult<Vec<FolderAssignment>> {
        sqlx::query_as::<_, FolderAssignment>(
            "SELECT * FROM smart_folder_assignments \
             WHERE user_id = $1 AND ($2::uuid IS NULL OR folder_id = $2) \
             ORDER BY assigned_at DESC",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list assignments", e))
    }

    async fn update_assignment_path(
        &self,
        user_id: UserId,
        from: &str,
        to: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE smart_folder_assignments SET document_path = $3 \
             WHERE user_id = $1 AND document_path = $2",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move assignment", e))?;
        Ok(result.rows_affected())
    }
}
