//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Public share link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Base URL for share links when they are served from a different host
    /// than the API (e.g. a web frontend). Falls back to
    /// `server.public_base_url`.
    #[serde(default)]
    pub link_base_url: Option<String>,
    /// Upper bound for `expires_in_hours` on new shares. 0 disables the
    /// bound.
    #[serde(default = "default_max_expiry_hours")]
    pub max_expiry_hours: i64,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            link_base_url: None,
            max_expiry_hours: default_max_expiry_hours(),
        }
    }
}

fn default_max_expiry_hours() -> i64 {
    24 * 365
}
