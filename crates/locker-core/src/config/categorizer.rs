//! AI categorization client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the chat-completion categorizer and its pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizerConfig {
    /// Whether the remote model is consulted at all. When false only the
    /// keyword heuristics run.
    #[serde(default)]
    pub enabled: bool,
    /// OpenAI-compatible chat-completions endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer API key. Missing key means heuristics only.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Delay between consecutive calls during bulk operations.
    #[serde(default = "default_pacing")]
    pub pacing_ms: u64,
    /// Suggestions at or above this confidence are applied automatically
    /// during bulk operations.
    #[serde(default = "default_threshold")]
    pub auto_apply_threshold: f32,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            request_timeout_seconds: default_timeout(),
            pacing_ms: default_pacing(),
            auto_apply_threshold: default_threshold(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_pacing() -> u64 {
    500
}

fn default_threshold() -> f32 {
    0.75
}
