//! In-memory smart folders and assignments.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::{AssignmentId, SmartFolderId, UserId};
use locker_entity::folder::{CreateSmartFolder, FolderAssignment, SmartFolder, UpdateSmartFolder};

use crate::store::FolderStore;

#[derive(Debug, Default)]
struct Tables {
    folders: Vec<SmartFolder>,
    assignments: Vec<FolderAssignment>,
}

/// Folder and assignment tables held in memory. Deleting a folder
/// cascades to its assignments.
#[derive(Debug, Default)]
pub struct MemoryFolderStore {
    tables: RwLock<Tables>,
}

impl MemoryFolderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(tables: &Tables, user_id: UserId, name: &str, except: Option<SmartFolderId>) -> bool {
    tables
        .folders
        .iter()
        .any(|f| f.user_id == user_id && f.folder_name == name && Some(f.id) != except)
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn create(&self, data: &CreateSmartFolder) -> AppResult<SmartFolder> {
        let mut tables = self.tables.write().await;
        if name_taken(&tables, data.user_id, &data.folder_name, None) {
            return Err(AppError::conflict(format!(
                "Folder '{}' already exists",
                data.folder_name
            )));
        }
        let now = Utc::now();
        let folder = SmartFolder {
            id: SmartFolderId::new(),
            user_id: data.user_id,
            folder_name: data.folder_name.clone(),
            folder_description: data.folder_description.clone(),
            keywords: data.keywords.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.folders.push(folder.clone());
        Ok(folder)
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
        id: SmartFolderId,
    ) -> AppResult<Option<SmartFolder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .cloned())
    }

    async fn find_by_name(&self, user_id: UserId, name: &str) -> AppResult<Option<SmartFolder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .iter()
            .find(|f| f.user_id == user_id && f.folder_name == name)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SmartFolder>> {
        let tables = self.tables.read().await;
        let mut folders: Vec<SmartFolder> = tables
            .folders
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
        Ok(folders)
    }

    async fn update(
        &self,
        user_id: UserId,
        id: SmartFolderId,
        data: &UpdateSmartFolder,
    ) -> AppResult<Option<SmartFolder>> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &data.folder_name {
            if name_taken(&tables, user_id, name, Some(id)) {
                return Err(AppError::conflict(format!("Folder '{name}' already exists")));
            }
        }
        let Some(folder) = tables
            .folders
            .iter_mut()
            .find(|f| f.id == id && f.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &data.folder_name {
            folder.folder_name = name.clone();
        }
        if let Some(description) = &data.folder_description {
            folder.folder_description = description.clone();
        }
        if let Some(keywords) = &data.keywords {
            folder.keywords = keywords.clone();
        }
        folder.updated_at = Utc::now();
        Ok(Some(folder.clone()))
    }

    async fn delete(&self, user_id: UserId, id: SmartFolderId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.folders.len();
        tables
            .folders
            .retain(|f| !(f.id == id && f.user_id == user_id));
        let removed = tables.folders.len() < before;
        if removed {
            tables.assignments.retain(|a| a.folder_id != id);
        }
        Ok(removed)
    }

    async fn upsert_assignment(
        &self,
        user_id: UserId,
        document_path: &str,
        folder_id: SmartFolderId,
    ) -> AppResult<FolderAssignment> {
        let mut tables = self.tables.write().await;
        if !tables.folders.iter().any(|f| f.id == folder_id) {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        let now = Utc::now();
        if let Some(existing) = tables
            .assignments
            .iter_mut()
            .find(|a| a.user_id == user_id && a.document_path == document_path)
        {
            existing.folder_id = folder_id;
            existing.assigned_at = now;
            return Ok(existing.clone());
        }
        let assignment = FolderAssignment {
            id: AssignmentId::new(),
            user_id,
            document_path: document_path.to_string(),
            folder_id,
            assigned_at: now,
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn remove_assignment(&self, user_id: UserId, document_path: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.assignments.len();
        tables
            .assignments
            .retain(|a| !(a.user_id == user_id && a.document_path == document_path));
        Ok(tables.assignments.len() < before)
    }

    async fn find_assignment(
        &self,
        user_id: UserId,
        document_path: &str,
    ) -> AppResult<Option<FolderAssignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .find(|a| a.user_id == user_id && a.document_path == document_path)
            .cloned())
    }

    async fn list_assignments(
        &self,
        user_id: UserId,
        folder_id: Option<SmartFolderId>,
    ) -> AppResult<Vec<FolderAssignment>> {
        let tables = self.tables.read().await;
        let mut assignments: Vec<FolderAssignment> = tables
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id && folder_id.is_none_or(|id| a.folder_id == id))
            .cloned()
            .collect();
        assignments.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        Ok(assignments)
    }

    async fn update_assignment_path(
        &self,
        user_id: UserId,
        from: &str,
        to: &str,
    ) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let mut moved = 0;
        for assignment in tables
            .assignments
            .iter_mut()
            .filter(|a| a.user_id == user_id && a.document_path == from)
        {
            assignment.document_path = to.to_string();
            moved += 1;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locker_core::error::ErrorKind;

    fn folder(user_id: UserId, name: &str) -> CreateSmartFolder {
        CreateSmartFolder {
            user_id,
            folder_name: name.to_string(),
            folder_description: None,
            keywords: vec!["tax".to_string()],
        }
    }

    #[tokio::test]
    async fn test_folder_names_unique_per_user() {
        let store = MemoryFolderStore::new();
        let alice = UserId::new();
        store.create(&folder(alice, "Taxes")).await.unwrap();
        let err = store.create(&folder(alice, "Taxes")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        store.create(&folder(UserId::new(), "Taxes")).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let store = MemoryFolderStore::new();
        let user = UserId::new();
        store.create(&folder(user, "A")).await.unwrap();
        let b = store.create(&folder(user, "B")).await.unwrap();
        let update = UpdateSmartFolder {
            folder_name: Some("A".to_string()),
            ..Default::default()
        };
        assert!(store.update(user, b.id, &update).await.is_err());

        let clear = UpdateSmartFolder {
            folder_description: Some(None),
            keywords: Some(vec![]),
            ..Default::default()
        };
        let updated = store.update(user, b.id, &clear).await.unwrap().unwrap();
        assert_eq!(updated.folder_name, "B");
        assert!(updated.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_assignment_is_upserted_and_cascades() {
        let store = MemoryFolderStore::new();
        let user = UserId::new();
        let a = store.create(&folder(user, "A")).await.unwrap();
        let b = store.create(&folder(user, "B")).await.unwrap();

        store.upsert_assignment(user, "u/doc.pdf", a.id).await.unwrap();
        store.upsert_assignment(user, "u/doc.pdf", b.id).await.unwrap();
        let all = store.list_assignments(user, None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].folder_id, b.id);

        assert!(store.delete(user, b.id).await.unwrap());
        assert!(store.find_assignment(user, "u/doc.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assignment_to_missing_folder_is_not_found() {
        let store = MemoryFolderStore::new();
        let err = store
            .upsert_assignment(UserId::new(), "u/doc.pdf", SmartFolderId::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
