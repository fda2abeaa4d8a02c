//! Object key codec.
//!
//! Documents are stored under
//! `{userId}[/private]/{timestamp_ms}_{category}_{sanitizedName}.{ext}`.
//! The key is the only place the category and upload time live, so it is
//! decoded exactly once here and the rest of the workspace works with
//! [`DocumentPath`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::UserId;

use crate::category::Category;

/// Path segment separating private documents from the rest.
pub const PRIVATE_SEGMENT: &str = "private";

/// A decoded object key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPath {
    raw: String,
    owner: String,
    is_private: bool,
    file_name: String,
    timestamp_ms: Option<i64>,
    category: Category,
    name: String,
}

impl DocumentPath {
    /// Decode an object key.
    ///
    /// Parsing is purely syntactic. A file name with fewer than three
    /// `_`-separated segments has category [`Category::Other`]; keys under
    /// `{owner}/private/` always have [`Category::Private`].
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim_start_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        let (owner, file_name) = match (segments.first(), segments.last()) {
            (Some(owner), Some(file_name)) if segments.len() >= 2 => (*owner, *file_name),
            _ => {
                return Err(AppError::validation(format!(
                    "Document path '{raw}' has no owner segment"
                )));
            }
        };
        if owner.is_empty() || file_name.is_empty() {
            return Err(AppError::validation(format!(
                "Document path '{raw}' is incomplete"
            )));
        }

        let is_private = segments.len() >= 3 && segments[1] == PRIVATE_SEGMENT;

        let parts: Vec<&str> = file_name.split('_').collect();
        let (timestamp_ms, category, name) = if parts.len() >= 3 {
            (
                parts[0].parse::<i64>().ok(),
                Category::parse(parts[1]),
                parts[2..].join("_"),
            )
        } else {
            (None, Category::Other, file_name.to_string())
        };

        Ok(Self {
            raw: raw.to_string(),
            owner: owner.to_string(),
            is_private,
            file_name: file_name.to_string(),
            timestamp_ms,
            category: if is_private { Category::Private } else { category },
            name,
        })
    }

    /// Build the key for a new upload.
    pub fn compose(
        owner: &UserId,
        is_private: bool,
        timestamp_ms: i64,
        category: &Category,
        original_name: &str,
    ) -> AppResult<Self> {
        let sanitized = sanitize_file_name(original_name);
        if sanitized.is_empty() {
            return Err(AppError::validation(format!(
                "File name '{original_name}' has no usable characters"
            )));
        }

        let category = if is_private {
            Category::Private
        } else {
            category.clone()
        };
        let file_name = format!("{timestamp_ms}_{}_{sanitized}", checked_token(&category)?);
        let raw = if is_private {
            format!("{owner}/{PRIVATE_SEGMENT}/{file_name}")
        } else {
            format!("{owner}/{file_name}")
        };
        Self::parse(&raw)
    }

    /// The key with the category segment replaced. Keys that never carried
    /// a category get `fallback_timestamp_ms` as their timestamp segment.
    pub fn with_category(&self, category: &Category, fallback_timestamp_ms: i64) -> AppResult<Self> {
        let timestamp = self.timestamp_segment().unwrap_or_else(|| fallback_timestamp_ms.to_string());
        let file_name = format!("{timestamp}_{}_{}", checked_token(category)?, self.name);
        let prefix = &self.raw[..self.raw.len() - self.file_name.len()];
        Self::parse(&format!("{prefix}{file_name}"))
    }

    fn timestamp_segment(&self) -> Option<String> {
        let parts: Vec<&str> = self.file_name.split('_').collect();
        (parts.len() >= 3).then(|| parts[0].to_string())
    }

    /// The key exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// First path segment, the owning user.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether the key belongs to `user`.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == user.to_string()
    }

    /// Whether the key is under the owner's `private/` prefix.
    pub fn is_private(&self) -> bool {
        self.is_private
    }

    /// Whether reading the document needs a private-access grant: either
    /// it lives under the private prefix or its key carries the private
    /// category token.
    pub fn requires_private_access(&self) -> bool {
        self.is_private || self.category.is_private()
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Category decoded from the file name.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Upload time decoded from the timestamp segment, if numeric.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms.and_then(DateTime::from_timestamp_millis)
    }

    /// File extension, lowercased.
    pub fn extension(&self) -> Option<String> {
        split_extension(&self.file_name).1.map(str::to_ascii_lowercase)
    }

    /// Human-readable name: the name segment with its extension stripped
    /// and underscores shown as spaces.
    pub fn display_name(&self) -> String {
        split_extension(&self.name).0.replace('_', " ")
    }

    /// The legacy location of this document: `{owner}/{file_name}`.
    pub fn flat_key(&self) -> String {
        format!("{}/{}", self.owner, self.file_name)
    }
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The category segment for a new key. Anything outside
/// `[A-Za-z0-9-]` would add path or name segments, so it is refused.
fn checked_token(category: &Category) -> AppResult<String> {
    let token = category.path_token();
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AppError::validation(format!(
            "Category '{category}' may only contain letters, digits and hyphens"
        )));
    }
    Ok(token)
}

/// Replace characters outside `[A-Za-z0-9._-]` with `_`, collapse runs of
/// `_`, and drop leading dots so the result is never a hidden file.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut out = String::with_capacity(base.len());
    for ch in base.chars() {
        let ch = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            ch
        } else {
            '_'
        };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    out.trim_start_matches('.').trim_matches('_').to_string()
}

/// Split `name` into stem and extension. Dot-files have no extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}
