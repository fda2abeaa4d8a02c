//! Categorization orchestration.
//!
//! Bulk runs are a sequential loop with a fixed pause between categorizer
//! calls. A failure on one document is reported as an advisory and the
//! loop moves on.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use locker_categorizer::{Categorizer, FolderCandidate};
use locker_core::config::CategorizerConfig;
use locker_core::error::{AppError, ErrorKind};
use locker_core::result::AppResult;
use locker_core::types::{Outcome, SmartFolderId};
use locker_database::store::FolderStore;
use locker_entity::categorization::{CategorySuggestion, FolderDecision};
use locker_entity::document::{DocumentEntry, DocumentPath};
use locker_entity::folder::{CreateSmartFolder, SmartFolder};

use crate::context::RequestContext;
use crate::document::DocumentService;

/// A category that was applied during a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedCategory {
    /// Key before the move.
    pub from_path: String,
    /// Key after the move.
    pub to_path: String,
    /// The suggestion that was applied.
    pub suggestion: CategorySuggestion,
}

/// A suggestion below the auto-apply threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCategory {
    /// Document key.
    pub path: String,
    /// Document display name.
    pub display_name: String,
    /// The suggestion awaiting confirmation.
    pub suggestion: CategorySuggestion,
}

/// Result of a bulk categorization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCategorization {
    /// Documents that were moved.
    pub applied: Vec<AppliedCategory>,
    /// Suggestions left for the user.
    pub pending: Vec<PendingCategory>,
}

/// A document placed into a folder during auto-assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedDocument {
    /// Document key.
    pub path: String,
    /// Target folder.
    pub folder_id: SmartFolderId,
    /// Target folder name.
    pub folder_name: String,
    /// Whether the folder was created for this document.
    pub created_folder: bool,
    /// The decision that was applied.
    pub decision: FolderDecision,
}

/// A folder decision below the auto-apply threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingFolder {
    /// Document key.
    pub path: String,
    /// The decision awaiting confirmation.
    pub decision: FolderDecision,
}

/// Result of an auto-assignment run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoAssignment {
    /// Documents that were assigned.
    pub assigned: Vec<AssignedDocument>,
    /// Decisions left for the user.
    pub pending: Vec<PendingFolder>,
}

/// Suggests categories and folders and applies confident ones.
#[derive(Debug, Clone)]
pub struct CategorizeService {
    documents: Arc<DocumentService>,
    folder_store: Arc<dyn FolderStore>,
    categorizer: Arc<dyn Categorizer>,
    pacing: Duration,
    threshold: f32,
}

impl CategorizeService {
    /// Creates a new categorize service.
    pub fn new(
        documents: Arc<DocumentService>,
        folder_store: Arc<dyn FolderStore>,
        categorizer: Arc<dyn Categorizer>,
        config: &CategorizerConfig,
    ) -> Self {
        Self {
            documents,
            folder_store,
            categorizer,
            pacing: Duration::from_millis(config.pacing_ms),
            threshold: config.auto_apply_threshold,
        }
    }

    /// Suggests a category for a file name.
    pub async fn suggest(
        &self,
        _ctx: &RequestContext,
        filename: &str,
    ) -> AppResult<CategorySuggestion> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(AppError::validation("Filename is required"));
        }
        Ok(self.categorizer.suggest_category(filename).await)
    }

    /// Categorizes every uncategorized, non-private document.
    pub async fn bulk_categorize(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Outcome<BulkCategorization>> {
        let candidates: Vec<DocumentEntry> = self
            .documents
            .list_active(ctx)
            .await?
            .into_iter()
            .filter(|d| !d.is_private && d.category.is_other())
            .collect();

        let mut outcome = Outcome::clean(BulkCategorization::default());
        for (i, document) in candidates.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }

            let suggestion = self
                .categorizer
                .suggest_category(&categorizer_name(document))
                .await;

            let confident = suggestion.confidence >= self.threshold
                && !suggestion.category.is_other()
                && !suggestion.category.is_private();
            if !confident {
                outcome.value.pending.push(PendingCategory {
                    path: document.path.clone(),
                    display_name: document.display_name.clone(),
                    suggestion,
                });
                continue;
            }

            match self
                .documents
                .recategorize(ctx, &document.path, &suggestion.category)
                .await
            {
                Ok(moved) => {
                    outcome.advisories.extend(moved.advisories);
                    outcome.value.applied.push(AppliedCategory {
                        from_path: document.path.clone(),
                        to_path: moved.value.path,
                        suggestion,
                    });
                }
                Err(e) => outcome.advise("categorize.apply", format!("{}: {e}", document.path)),
            }
        }

        info!(
            user_id = %ctx.user_id,
            applied = outcome.value.applied.len(),
            pending = outcome.value.pending.len(),
            "Bulk categorization finished"
        );

        Ok(outcome)
    }

    /// Places every unassigned, non-private document into a folder,
    /// creating folders on demand.
    pub async fn auto_assign(&self, ctx: &RequestContext) -> AppResult<Outcome<AutoAssignment>> {
        let assigned: HashSet<String> = self
            .folder_store
            .list_assignments(ctx.user_id, None)
            .await?
            .into_iter()
            .map(|a| a.document_path)
            .collect();
        let candidates: Vec<DocumentEntry> = self
            .documents
            .list_active(ctx)
            .await?
            .into_iter()
            .filter(|d| !d.is_private && !assigned.contains(&d.path))
            .collect();

        let mut folders = self.folder_store.list_for_user(ctx.user_id).await?;
        let mut outcome = Outcome::clean(AutoAssignment::default());

        for (i, document) in candidates.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }

            let offered: Vec<FolderCandidate> = folders
                .iter()
                .map(|f| FolderCandidate {
                    name: f.folder_name.clone(),
                    keywords: f.keywords.clone(),
                })
                .collect();
            let decision = self
                .categorizer
                .suggest_folder(&categorizer_name(document), &offered)
                .await;

            if decision.confidence < self.threshold || decision.folder_name.trim().is_empty() {
                outcome.value.pending.push(PendingFolder {
                    path: document.path.clone(),
                    decision,
                });
                continue;
            }

            let (folder, created) = match self.folder_for(ctx, &mut folders, &decision).await {
                Ok(found) => found,
                Err(e) => {
                    outcome.advise("folders.create", format!("{}: {e}", decision.folder_name));
                    continue;
                }
            };

            match self
                .folder_store
                .upsert_assignment(ctx.user_id, &document.path, folder.id)
                .await
            {
                Ok(_) => outcome.value.assigned.push(AssignedDocument {
                    path: document.path.clone(),
                    folder_id: folder.id,
                    folder_name: folder.folder_name.clone(),
                    created_folder: created,
                    decision,
                }),
                Err(e) => outcome.advise("folders.assign", format!("{}: {e}", document.path)),
            }
        }

        info!(
            user_id = %ctx.user_id,
            assigned = outcome.value.assigned.len(),
            pending = outcome.value.pending.len(),
            "Folder auto-assignment finished"
        );

        Ok(outcome)
    }

    /// The folder a decision names, created when missing. A concurrent
    /// create of the same name is resolved by looking the folder up.
    async fn folder_for(
        &self,
        ctx: &RequestContext,
        folders: &mut Vec<SmartFolder>,
        decision: &FolderDecision,
    ) -> AppResult<(SmartFolder, bool)> {
        let name = decision.folder_name.trim();
        if let Some(existing) = folders
            .iter()
            .find(|f| f.folder_name.eq_ignore_ascii_case(name))
        {
            return Ok((existing.clone(), false));
        }

        let created = self
            .folder_store
            .create(&CreateSmartFolder {
                user_id: ctx.user_id,
                folder_name: name.to_string(),
                folder_description: Some(decision.reasoning.clone())
                    .filter(|r| !r.trim().is_empty()),
                keywords: Vec::new(),
            })
            .await;

        let (folder, is_new) = match created {
            Ok(folder) => (folder, true),
            Err(e) if e.kind == ErrorKind::Conflict => {
                let folder = self
                    .folder_store
                    .find_by_name(ctx.user_id, name)
                    .await?
                    .ok_or(e)?;
                (folder, false)
            }
            Err(e) => return Err(e),
        };

        folders.push(folder.clone());
        Ok((folder, is_new))
    }

    async fn pause(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }
}

/// The name handed to the categorizer: the human-readable name with its
/// extension, without the timestamp and category segments.
fn categorizer_name(document: &DocumentEntry) -> String {
    let extension = DocumentPath::parse(&document.path)
        .ok()
        .and_then(|p| p.extension());
    match extension {
        Some(ext) => format!("{}.{ext}", document.display_name),
        None => document.display_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use locker_core::traits::storage::StorageProvider;
    use locker_entity::Category;
    use locker_entity::categorization::SuggestionSource;

    use crate::testing::Fixture;

    use super::*;

    #[tokio::test]
    async fn test_suggest_requires_filename() {
        let fx = Fixture::new();
        let err = fx.categorize.suggest(&fx.ctx(), "  ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let suggestion = fx
            .categorize
            .suggest(&fx.ctx(), "bank_statement_march.pdf")
            .await
            .unwrap();
        assert_eq!(suggestion.category, Category::Financial);
        assert_eq!(suggestion.source, SuggestionSource::Heuristic);
    }

    #[tokio::test]
    async fn test_bulk_applies_confident_and_leaves_the_rest() {
        let fx = Fixture::new();
        fx.put("1_other_bank_statement.pdf", b"x").await;
        fx.put("2_other_invoice.pdf", b"x").await;
        fx.put("3_legal_contract.pdf", b"x").await;
        fx.put("random.pdf", b"x").await;
        fx.put("private/4_private_bank_statement.pdf", b"x").await;

        let outcome = fx.categorize.bulk_categorize(&fx.private_ctx()).await.unwrap();
        assert!(outcome.is_clean());

        let applied = &outcome.value.applied;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].to_path, fx.key("1_financial_bank_statement.pdf"));

        let pending: Vec<_> = outcome.value.pending.iter().map(|p| p.path.clone()).collect();
        assert_eq!(pending, vec![fx.key("2_other_invoice.pdf"), fx.key("random.pdf")]);

        assert!(fx.storage.exists(&fx.key("3_legal_contract.pdf")).await.unwrap());
    }

    #[tokio::test]
    async fn test_auto_assign_creates_folder_once() {
        let fx = Fixture::new();
        fx.put("1_financial_bank_statement.pdf", b"x").await;
        fx.put("2_financial_tax_invoice.pdf", b"x").await;
        fx.put("3_other_notes.pdf", b"x").await;

        let outcome = fx.categorize.auto_assign(&fx.ctx()).await.unwrap();
        assert!(outcome.is_clean());

        let assigned = &outcome.value.assigned;
        assert_eq!(assigned.len(), 2);
        assert!(assigned[0].created_folder);
        assert!(!assigned[1].created_folder);
        assert_eq!(assigned[0].folder_id, assigned[1].folder_id);
        assert_eq!(assigned[0].folder_name, "Financial");
        assert_eq!(outcome.value.pending.len(), 1);

        let folders = fx.folders.list_folders(&fx.ctx()).await.unwrap();
        assert_eq!(folders.len(), 1);

        let again = fx.categorize.auto_assign(&fx.ctx()).await.unwrap();
        assert!(again.value.assigned.is_empty());
        assert_eq!(again.value.pending.len(), 1);
    }

    #[tokio::test]
    async fn test_auto_assign_prefers_keyword_folder() {
        let fx = Fixture::new();
        let key = fx.put("1_other_w2_2024.pdf", b"x").await;
        fx.folders
            .create_folder(
                &fx.ctx(),
                crate::folder::CreateFolderRequest {
                    name: "Taxes".to_string(),
                    description: None,
                    keywords: vec!["w2".to_string(), "2024".to_string()],
                },
            )
            .await
            .unwrap();

        let outcome = fx.categorize.auto_assign(&fx.ctx()).await.unwrap();
        assert_eq!(outcome.value.assigned.len(), 1);
        assert_eq!(outcome.value.assigned[0].path, key);
        assert_eq!(outcome.value.assigned[0].folder_name, "Taxes");
        assert!(!outcome.value.assigned[0].created_folder);
    }
}
