//! Smart folder CRUD and document assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::SmartFolderId;
use locker_database::store::FolderStore;
use locker_entity::folder::{CreateSmartFolder, FolderAssignment, SmartFolder, UpdateSmartFolder};

use crate::context::RequestContext;
use crate::document::DocumentService;

/// Longest accepted folder name.
const MAX_NAME_LEN: usize = 255;

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Keywords used when matching documents to the folder.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Request to update a folder. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    /// Replacement keyword list.
    pub keywords: Option<Vec<String>>,
}

/// Manages the user's smart folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    folder_store: Arc<dyn FolderStore>,
    documents: Arc<DocumentService>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_store: Arc<dyn FolderStore>, documents: Arc<DocumentService>) -> Self {
        Self {
            folder_store,
            documents,
        }
    }

    /// Creates a folder. Names are unique per user.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<SmartFolder> {
        let folder = self
            .folder_store
            .create(&CreateSmartFolder {
                user_id: ctx.user_id,
                folder_name: clean_name(&req.name)?,
                folder_description: clean_description(req.description),
                keywords: clean_keywords(req.keywords),
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            name = %folder.folder_name,
            "Smart folder created"
        );

        Ok(folder)
    }

    /// Lists the user's folders by name.
    pub async fn list_folders(&self, ctx: &RequestContext) -> AppResult<Vec<SmartFolder>> {
        self.folder_store.list_for_user(ctx.user_id).await
    }

    /// Renames a folder or changes its description or keywords.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        id: SmartFolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<SmartFolder> {
        let update = UpdateSmartFolder {
            folder_name: req.name.as_deref().map(clean_name).transpose()?,
            folder_description: req.description.map(clean_description),
            keywords: req.keywords.map(clean_keywords),
        };

        let folder = self
            .folder_store
            .update(ctx.user_id, id, &update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        info!(user_id = %ctx.user_id, folder_id = %id, "Smart folder updated");
        Ok(folder)
    }

    /// Deletes a folder together with its assignments.
    pub async fn delete_folder(&self, ctx: &RequestContext, id: SmartFolderId) -> AppResult<()> {
        if !self.folder_store.delete(ctx.user_id, id).await? {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }
        info!(user_id = %ctx.user_id, folder_id = %id, "Smart folder deleted");
        Ok(())
    }

    /// Puts a document into a folder, replacing any previous assignment.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        document_path: &str,
        folder_id: SmartFolderId,
    ) -> AppResult<FolderAssignment> {
        let path = self.documents.ensure_active(ctx, document_path).await?;
        if path.is_private() {
            ctx.require_private_access()?;
        }

        let assignment = self
            .folder_store
            .upsert_assignment(ctx.user_id, path.as_str(), folder_id)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            path = %path,
            "Document assigned to folder"
        );
        Ok(assignment)
    }

    /// Removes a document from its folder.
    pub async fn unassign(&self, ctx: &RequestContext, document_path: &str) -> AppResult<()> {
        if !self
            .folder_store
            .remove_assignment(ctx.user_id, document_path)
            .await?
        {
            return Err(AppError::not_found(format!(
                "Document '{document_path}' is not in a folder"
            )));
        }
        info!(user_id = %ctx.user_id, path = %document_path, "Document unassigned");
        Ok(())
    }

    /// Lists assignments, optionally for one folder only.
    pub async fn list_assignments(
        &self,
        ctx: &RequestContext,
        folder_id: Option<SmartFolderId>,
    ) -> AppResult<Vec<FolderAssignment>> {
        if let Some(id) = folder_id {
            self.folder_store
                .find_by_id(ctx.user_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        }
        self.folder_store
            .list_assignments(ctx.user_id, folder_id)
            .await
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn clean_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !cleaned.contains(&keyword) {
            cleaned.push(keyword);
        }
    }
    cleaned
}
