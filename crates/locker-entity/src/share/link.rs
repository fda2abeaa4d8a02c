//! Share link value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use locker_core::types::ShareId;

use super::model::DocumentShare;

/// A created or listed share together with its public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// The share ID.
    pub share_id: ShareId,
    /// Object key of the shared document.
    pub document_path: String,
    /// The full URL for accessing the share.
    pub url: String,
    /// The share token.
    pub token: String,
    /// Whether the link is public.
    pub is_public: bool,
    /// Whether the link is password-protected.
    pub is_password_protected: bool,
    /// Whether downloads are offered.
    pub allow_download: bool,
    /// When the link expires (if set).
    pub expires_at: Option<DateTime<Utc>>,
    /// Number of successful resolutions.
    pub access_count: i32,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    /// Build the link for `share` under `base_url`.
    pub fn new(share: &DocumentShare, base_url: &str) -> Self {
        Self {
            share_id: share.id,
            document_path: share.document_path.clone(),
            url: format!(
                "{}/shared/{}",
                base_url.trim_end_matches('/'),
                share.share_token
            ),
            token: share.share_token.clone(),
            is_public: share.is_public,
            is_password_protected: share.requires_password(),
            allow_download: share.allow_download,
            expires_at: share.expires_at,
            access_count: share.access_count,
            created_at: share.created_at,
        }
    }
}
