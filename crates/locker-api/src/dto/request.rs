//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use locker_core::types::SmartFolderId;
use locker_service::folder::CreateFolderRequest;
use locker_service::share::CreateShareRequest;

/// `?path=` query naming one document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentPathQuery {
    /// Object key.
    #[validate(length(min = 1, message = "path is required"))]
    pub path: String,
}

/// Body naming one document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentPathRequest {
    /// Object key.
    #[validate(length(min = 1, message = "path is required"))]
    pub path: String,
}

/// Change the category of a document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecategorizeRequest {
    /// Object key.
    #[validate(length(min = 1, message = "path is required"))]
    pub path: String,
    /// Target category token.
    #[validate(length(min = 1, max = 64, message = "category must be 1-64 characters"))]
    pub category: String,
}

/// Purge trash entries older than `days`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PurgeRequest {
    /// Age threshold in days; the configured retention when absent.
    #[serde(default)]
    #[validate(range(max = 36500, message = "days is out of range"))]
    pub days: Option<u32>,
}

/// Create a share link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareBody {
    /// Object key.
    #[validate(length(min = 1, message = "document_path is required"))]
    pub document_path: String,
    /// Whether anonymous visitors may resolve the link.
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Hours until expiry; 0 means never.
    #[serde(default)]
    #[validate(range(min = 0, message = "expires_in_hours must not be negative"))]
    pub expires_in_hours: i64,
    /// Password protection.
    #[serde(default)]
    #[validate(length(min = 1, max = 256, message = "password must be 1-256 characters"))]
    pub password: Option<String>,
    /// Whether the visitor may download.
    #[serde(default = "default_true")]
    pub allow_download: bool,
}

fn default_true() -> bool {
    true
}

impl From<CreateShareBody> for CreateShareRequest {
    fn from(body: CreateShareBody) -> Self {
        Self {
            document_path: body.document_path,
            is_public: body.is_public,
            expires_in_hours: body.expires_in_hours,
            password: body.password,
            allow_download: body.allow_download,
        }
    }
}

/// Password presented for a protected share.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnlockShareRequest {
    /// The share password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Create a smart folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderBody {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Matching keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl From<CreateFolderBody> for CreateFolderRequest {
    fn from(body: CreateFolderBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            keywords: body.keywords,
        }
    }
}

/// Assign a document to a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignRequest {
    /// Object key.
    #[validate(length(min = 1, message = "document_path is required"))]
    pub document_path: String,
    /// Target folder.
    pub folder_id: SmartFolderId,
}

/// `?folder_id=` filter for the assignment listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentQuery {
    /// Restrict to one folder.
    #[serde(default)]
    pub folder_id: Option<SmartFolderId>,
}

/// Ask for a category suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SuggestRequest {
    /// File name to classify.
    #[validate(length(min = 1, max = 512, message = "filename must be 1-512 characters"))]
    pub filename: String,
}

/// Query of a locally signed object URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedObjectQuery {
    /// Unix expiry, seconds.
    pub expires: i64,
    /// Hex HMAC over key and expiry.
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_body_defaults() {
        let body: CreateShareBody =
            serde_json::from_str(r#"{"document_path":"u/1_legal_a.pdf"}"#).unwrap();
        assert!(body.is_public);
        assert!(body.allow_download);
        assert_eq!(body.expires_in_hours, 0);
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_negative_expiry_is_rejected() {
        let body: CreateShareBody =
            serde_json::from_str(r#"{"document_path":"u/a.pdf","expires_in_hours":-1}"#).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let body: CreateShareBody =
            serde_json::from_str(r#"{"document_path":"u/a.pdf","password":""}"#).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_recategorize_requires_fields() {
        let body = RecategorizeRequest {
            path: String::new(),
            category: "legal".to_string(),
        };
        assert!(body.validate().is_err());
    }
}
