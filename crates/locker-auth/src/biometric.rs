//! Device biometric verification.
//!
//! The device performs the biometric check and sends an opaque assertion;
//! a [`BiometricVerifier`] decides whether that assertion is acceptable.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use locker_core::config::BiometricMode;
use locker_core::result::AppResult;
use locker_core::types::UserId;

/// An assertion produced by the device after a local biometric check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiometricAssertion {
    /// Device identifier, if the client supplies one.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Opaque assertion payload.
    pub assertion: String,
}

/// Decides whether a device assertion unlocks private documents.
#[async_trait]
pub trait BiometricVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Short name of the verifier for logs.
    fn mode(&self) -> &str;

    /// Returns `Ok(true)` if the assertion is accepted for `user_id`.
    async fn verify(&self, user_id: UserId, assertion: &BiometricAssertion) -> AppResult<bool>;
}

/// Rejects every assertion.
#[derive(Debug, Clone, Default)]
pub struct DisabledVerifier;

#[async_trait]
impl BiometricVerifier for DisabledVerifier {
    fn mode(&self) -> &str {
        "disabled"
    }

    async fn verify(&self, _user_id: UserId, _assertion: &BiometricAssertion) -> AppResult<bool> {
        Ok(false)
    }
}

/// Accepts any non-empty assertion, trusting the device's own check.
#[derive(Debug, Clone, Default)]
pub struct TrustDeviceVerifier;

#[async_trait]
impl BiometricVerifier for TrustDeviceVerifier {
    fn mode(&self) -> &str {
        "trust_device"
    }

    async fn verify(&self, _user_id: UserId, assertion: &BiometricAssertion) -> AppResult<bool> {
        Ok(!assertion.assertion.trim().is_empty())
    }
}

/// Build the verifier selected by configuration.
pub fn build_verifier(mode: BiometricMode) -> Arc<dyn BiometricVerifier> {
    match mode {
        BiometricMode::Disabled => Arc::new(DisabledVerifier),
        BiometricMode::TrustDevice => {
            tracing::warn!("Biometric verification trusts the device; do not use in production");
            Arc::new(TrustDeviceVerifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertion(value: &str) -> BiometricAssertion {
        BiometricAssertion {
            device_id: None,
            assertion: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_disabled_rejects_everything() {
        let verifier = build_verifier(BiometricMode::Disabled);
        assert!(!verifier.verify(UserId::new(), &assertion("ok")).await.unwrap());
    }

    #[tokio::test]
    async fn test_trust_device_requires_payload() {
        let verifier = build_verifier(BiometricMode::TrustDevice);
        assert!(verifier.verify(UserId::new(), &assertion("face-id")).await.unwrap());
        assert!(!verifier.verify(UserId::new(), &assertion("  ")).await.unwrap());
    }
}
