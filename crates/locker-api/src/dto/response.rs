//! Response DTOs.

use serde::{Deserialize, Serialize};

use locker_core::types::{Advisory, Outcome};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Best-effort steps that failed while the request itself succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            advisories: Vec::new(),
        }
    }

    /// Creates a successful response carrying the outcome's advisories.
    pub fn from_outcome(outcome: Outcome<T>) -> Self {
        Self {
            success: true,
            data: outcome.value,
            advisories: outcome.advisories,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signed URL of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResponse {
    /// Object key.
    pub path: String,
    /// Time-limited URL.
    pub url: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Storage provider type.
    pub storage_provider: String,
    /// Whether the storage backend answered.
    pub storage_healthy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_outcome_omits_advisories() {
        let json = serde_json::to_value(ApiResponse::from_outcome(Outcome::clean(1))).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 1}));
    }

    #[test]
    fn test_advisories_are_reported() {
        let mut outcome = Outcome::clean("done");
        outcome.advise("shares.delete", "store offline");
        let json = serde_json::to_value(ApiResponse::from_outcome(outcome)).unwrap();
        assert_eq!(json["advisories"][0]["step"], "shares.delete");
    }
}
