//! Document share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use locker_core::types::{ShareId, UserId};

/// A row in `document_shares`: a public link to one document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentShare {
    /// Unique share identifier.
    pub id: ShareId,
    /// User who created the share.
    pub user_id: UserId,
    /// Object key of the shared document.
    pub document_path: String,
    /// Unguessable URL token.
    pub share_token: String,
    /// Whether the link resolves for anonymous callers.
    pub is_public: bool,
    /// When the link stops resolving. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Argon2id PHC string for password-protected links.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether the resolved view offers a download.
    pub allow_download: bool,
    /// Number of successful resolutions.
    pub access_count: i32,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl DocumentShare {
    /// Whether the share has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Whether the share has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether a password must be presented before the document resolves.
    pub fn requires_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Data required to create a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentShare {
    /// Owner.
    pub user_id: UserId,
    /// Object key.
    pub document_path: String,
    /// URL token.
    pub share_token: String,
    /// Public flag.
    pub is_public: bool,
    /// Expiry (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Password hash (None = open).
    pub password_hash: Option<String>,
    /// Allow downloads.
    pub allow_download: bool,
}
