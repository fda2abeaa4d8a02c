//! Chat-completion categorizer.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use locker_core::config::CategorizerConfig;
use locker_core::error::{AppError, ErrorKind};
use locker_core::result::AppResult;
use locker_entity::Category;
use locker_entity::categorization::{CategorySuggestion, FolderDecision, SuggestionSource};

use crate::heuristics::HeuristicCategorizer;
use crate::prompt::{
    CategoryReply, FolderReply, SYSTEM_PROMPT, category_prompt, extract_json_object, folder_prompt,
};
use crate::{Categorizer, FolderCandidate};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Categorizer backed by an OpenAI-compatible chat-completions endpoint.
/// Every failure falls back to [`HeuristicCategorizer`].
#[derive(Clone)]
pub struct LlmCategorizer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    fallback: HeuristicCategorizer,
}

impl std::fmt::Debug for LlmCategorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmCategorizer")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmCategorizer {
    /// Creates a client with the configured per-request timeout.
    pub fn new(config: &CategorizerConfig, api_key: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            fallback: HeuristicCategorizer::new(),
        })
    }

    /// Send one prompt and return the reply text.
    async fn complete(&self, prompt: String) -> AppResult<String> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Categorizer request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Categorizer returned HTTP {status}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed categorizer response", e)
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::external_service("Categorizer reply had no content"))
    }

    async fn ask_category(&self, filename: &str) -> AppResult<CategorySuggestion> {
        let text = self.complete(category_prompt(filename)).await?;
        let json = extract_json_object(&text)
            .ok_or_else(|| AppError::external_service("No JSON object in categorizer reply"))?;
        let reply: CategoryReply = serde_json::from_str(json).map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Unparsable categorizer reply", e)
        })?;

        let category = Category::parse(&reply.category);
        if !Category::BUILT_IN.contains(&category) || category.is_private() {
            return Err(AppError::external_service(format!(
                "Categorizer chose unknown category '{}'",
                reply.category
            )));
        }
        Ok(CategorySuggestion::new(
            category,
            reply.confidence,
            reply.reasoning,
            SuggestionSource::Ai,
        ))
    }

    async fn ask_folder(
        &self,
        filename: &str,
        folders: &[FolderCandidate],
    ) -> AppResult<FolderDecision> {
        let text = self.complete(folder_prompt(filename, folders)).await?;
        let json = extract_json_object(&text)
            .ok_or_else(|| AppError::external_service("No JSON object in categorizer reply"))?;
        let reply: FolderReply = serde_json::from_str(json).map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Unparsable categorizer reply", e)
        })?;

        let name = reply.folder_name.trim();
        if name.is_empty() {
            return Err(AppError::external_service("Categorizer proposed an empty folder"));
        }
        let decision = match folders.iter().find(|f| f.name.eq_ignore_ascii_case(name)) {
            Some(existing) => FolderDecision::new(
                existing.name.clone(),
                false,
                reply.confidence,
                reply.reasoning,
                SuggestionSource::Ai,
            ),
            None => FolderDecision::new(
                name,
                true,
                reply.confidence,
                reply.reasoning,
                SuggestionSource::Ai,
            ),
        };
        Ok(decision)
    }
}

#[async_trait]
impl Categorizer for LlmCategorizer {
    async fn suggest_category(&self, filename: &str) -> CategorySuggestion {
        match self.ask_category(filename).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                warn!(filename, error = %e, "Falling back to heuristic categorization");
                self.fallback.categorize(filename)
            }
        }
    }

    async fn suggest_folder(&self, filename: &str, folders: &[FolderCandidate]) -> FolderDecision {
        match self.ask_folder(filename, folders).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(filename, error = %e, "Falling back to heuristic folder choice");
                self.fallback.choose_folder(filename, folders)
            }
        }
    }
}
