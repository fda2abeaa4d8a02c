//! Categorization results.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// The remote language model.
    Ai,
    /// Local keyword heuristics.
    Heuristic,
}

/// A suggested category for a file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    /// Suggested category.
    pub category: Category,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Short explanation.
    pub reasoning: String,
    /// Producer of the suggestion.
    pub source: SuggestionSource,
}

impl CategorySuggestion {
    /// Create a suggestion, clamping the confidence into `[0, 1]`.
    pub fn new(
        category: Category,
        confidence: f32,
        reasoning: impl Into<String>,
        source: SuggestionSource,
    ) -> Self {
        Self {
            category,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            source,
        }
    }
}

/// A suggested smart folder for a file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDecision {
    /// Existing or proposed folder name.
    pub folder_name: String,
    /// Whether the folder does not exist yet.
    pub is_new: bool,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Short explanation.
    pub reasoning: String,
    /// Producer of the decision.
    pub source: SuggestionSource,
}

impl FolderDecision {
    /// Create a decision, clamping the confidence into `[0, 1]`.
    pub fn new(
        folder_name: impl Into<String>,
        is_new: bool,
        confidence: f32,
        reasoning: impl Into<String>,
        source: SuggestionSource,
    ) -> Self {
        Self {
            folder_name: folder_name.into(),
            is_new,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            source,
        }
    }
}

/// Clamp into `[0, 1]`; NaN becomes 0.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
