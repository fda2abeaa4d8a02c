//! # locker-categorizer
//!
//! Suggests a category or a smart folder for a file name. The
//! [`LlmCategorizer`] asks an OpenAI-compatible chat-completions endpoint
//! and falls back to [`HeuristicCategorizer`] on any failure, so callers
//! always get an answer.

pub mod client;
pub mod heuristics;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use locker_core::config::CategorizerConfig;
use locker_core::result::AppResult;
use locker_entity::categorization::{CategorySuggestion, FolderDecision};

pub use client::LlmCategorizer;
pub use heuristics::HeuristicCategorizer;

/// An existing smart folder offered as a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCandidate {
    /// Folder name.
    pub name: String,
    /// Keywords the user attached to the folder.
    pub keywords: Vec<String>,
}

/// Produces categorization suggestions. Implementations never fail.
#[async_trait]
pub trait Categorizer: Send + Sync + std::fmt::Debug + 'static {
    /// Suggest a category for `filename`.
    async fn suggest_category(&self, filename: &str) -> CategorySuggestion;

    /// Suggest a folder for `filename` among `folders`, or a new one.
    async fn suggest_folder(&self, filename: &str, folders: &[FolderCandidate]) -> FolderDecision;
}

/// Build the categorizer selected by configuration. Without `enabled` or
/// an API key only the heuristics run.
pub fn build_categorizer(config: &CategorizerConfig) -> AppResult<Arc<dyn Categorizer>> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty());

    match api_key {
        Some(key) if config.enabled => {
            tracing::info!(model = %config.model, "Using chat-completion categorizer");
            Ok(Arc::new(LlmCategorizer::new(config, key)?))
        }
        _ => {
            tracing::info!("Using keyword heuristic categorizer");
            Ok(Arc::new(HeuristicCategorizer::new()))
        }
    }
}
