//! Private-access gate.
//!
//! Documents under `{user}/private/` are only listed with URLs, deleted, or
//! shared while the caller presents a valid grant. A grant is a
//! short-lived JWT of type `private_access` bound to one user.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use locker_core::config::AuthConfig;
use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::UserId;

use crate::biometric::{BiometricAssertion, BiometricVerifier};
use crate::jwt::{JwtDecoder, JwtEncoder};

/// A validated private-access grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrivateAccessGrant {
    /// User the grant was issued to.
    pub user_id: UserId,
    /// When the grant stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued grant.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedGrant {
    /// Token to send in the `X-Private-Access` header.
    pub token: String,
    /// Expiry of the token.
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates private-access grants.
#[derive(Debug, Clone)]
pub struct PrivateAccessGate {
    verifier: Arc<dyn BiometricVerifier>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    ttl: Duration,
}

impl PrivateAccessGate {
    /// Creates a gate over `verifier` using the auth configuration's
    /// signing secret and grant lifetime.
    pub fn new(config: &AuthConfig, verifier: Arc<dyn BiometricVerifier>) -> Self {
        Self {
            verifier,
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            ttl: Duration::seconds(config.private_access_ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }

    /// Verify a device assertion and issue a grant.
    pub async fn unlock(
        &self,
        user_id: UserId,
        assertion: &BiometricAssertion,
    ) -> AppResult<IssuedGrant> {
        if !self.verifier.verify(user_id, assertion).await? {
            warn!(
                user_id = %user_id,
                mode = self.verifier.mode(),
                "Biometric assertion rejected"
            );
            return Err(AppError::authorization("Biometric verification failed"));
        }

        let (token, expires_at) = self.encoder.issue_private_access(user_id, self.ttl)?;
        info!(user_id = %user_id, expires_at = %expires_at, "Private access granted");
        Ok(IssuedGrant { token, expires_at })
    }

    /// Validate a grant presented by `user_id`.
    pub fn validate(&self, token: &str, user_id: UserId) -> AppResult<PrivateAccessGrant> {
        let claims = self.decoder.decode_private_access(token)?;
        if claims.user_id() != user_id {
            return Err(AppError::authorization(
                "Private-access grant belongs to another user",
            ));
        }
        Ok(PrivateAccessGrant {
            user_id,
            expires_at: claims.expires_at(),
        })
    }
}
