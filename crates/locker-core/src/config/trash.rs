//! Trash retention configuration.

use serde::{Deserialize, Serialize};

/// Trash retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashConfig {
    /// Age in days after which `purge` removes trashed documents when the
    /// caller does not pass an explicit threshold.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

fn default_retention_days() -> u32 {
    30
}
