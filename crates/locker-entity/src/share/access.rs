//! Public share resolution result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Outcome of resolving a share token. Every state except
/// [`ShareState::Resolved`] withholds the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareState {
    /// The document URL is available.
    Resolved,
    /// No share has this token.
    NotFound,
    /// The share exists but is not public.
    NotPublic,
    /// The share expired.
    Expired,
    /// A password is required.
    Locked,
    /// The share is valid but the object no longer exists.
    Unavailable,
}

/// What an anonymous caller sees for a share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedDocumentView {
    /// Resolution state.
    pub state: ShareState,
    /// Document display name, present once the share is known to be live.
    pub display_name: Option<String>,
    /// Document category.
    pub category: Option<Category>,
    /// Signed content URL, only in [`ShareState::Resolved`].
    pub url: Option<String>,
    /// Whether the viewer may download the document.
    pub allow_download: bool,
    /// Share expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Set when an unlock attempt presented the wrong password.
    #[serde(default)]
    pub invalid_password: bool,
}

impl SharedDocumentView {
    /// A view that reveals nothing but the state.
    pub fn denied(state: ShareState) -> Self {
        Self {
            state,
            display_name: None,
            category: None,
            url: None,
            allow_download: false,
            expires_at: None,
            invalid_password: false,
        }
    }

    /// Whether the document URL is available.
    pub fn is_resolved(&self) -> bool {
        self.state == ShareState::Resolved
    }
}
