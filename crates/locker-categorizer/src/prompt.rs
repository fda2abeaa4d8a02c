//! Prompts for the chat-completion categorizer and reply parsing.

use serde::Deserialize;

use locker_entity::Category;

use crate::FolderCandidate;

/// System prompt shared by both requests.
pub const SYSTEM_PROMPT: &str = "You organize personal documents. \
Answer with a single JSON object and nothing else.";

/// Prompt asking for a category.
pub fn category_prompt(filename: &str) -> String {
    let categories: Vec<&str> = Category::BUILT_IN
        .iter()
        .filter(|c| !c.is_private())
        .map(Category::as_str)
        .collect();
    format!(
        "Choose the best category for the document named \"{filename}\".\n\
         Allowed categories: {}.\n\
         Reply as {{\"category\": string, \"confidence\": number between 0 and 1, \"reasoning\": string}}.",
        categories.join(", ")
    )
}

/// Prompt asking for a smart folder.
pub fn folder_prompt(filename: &str, folders: &[FolderCandidate]) -> String {
    let listing = if folders.is_empty() {
        "(none)".to_string()
    } else {
        folders
            .iter()
            .map(|f| {
                if f.keywords.is_empty() {
                    format!("- {}", f.name)
                } else {
                    format!("- {} (keywords: {})", f.name, f.keywords.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Pick a folder for the document named \"{filename}\".\n\
         Existing folders:\n{listing}\n\
         Prefer an existing folder. Propose a short new folder name only if none fits.\n\
         Reply as {{\"folder_name\": string, \"is_new\": boolean, \"confidence\": number between 0 and 1, \"reasoning\": string}}."
    )
}

/// The model's category reply.
#[derive(Debug, Deserialize)]
pub struct CategoryReply {
    /// Category token.
    pub category: String,
    /// Self-reported confidence.
    #[serde(default)]
    pub confidence: f32,
    /// Explanation.
    #[serde(default)]
    pub reasoning: String,
}

/// The model's folder reply.
#[derive(Debug, Deserialize)]
pub struct FolderReply {
    /// Folder name.
    pub folder_name: String,
    /// Whether the model thinks the folder is new. Recomputed by the
    /// caller against the real folder list.
    #[serde(default)]
    pub is_new: bool,
    /// Self-reported confidence.
    #[serde(default)]
    pub confidence: f32,
    /// Explanation.
    #[serde(default)]
    pub reasoning: String,
}

/// The text between the first `{` and the last `}` of `text`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
