//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// How device biometric assertions are checked before a private-access
/// grant is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometricMode {
    /// Every assertion is rejected; private documents stay locked.
    Disabled,
    /// Any non-empty assertion is accepted. Development only.
    TrustDevice,
}

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret used by the identity platform to sign
    /// bearer tokens. Also signs private-access grants.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim, if the identity platform sets one.
    #[serde(default)]
    pub jwt_issuer: Option<String>,
    /// Lifetime of a private-access grant in seconds.
    #[serde(default = "default_private_access_ttl")]
    pub private_access_ttl_seconds: u64,
    /// Biometric assertion verification mode.
    #[serde(default = "default_biometric_mode")]
    pub biometric_mode: BiometricMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: None,
            private_access_ttl_seconds: default_private_access_ttl(),
            biometric_mode: default_biometric_mode(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_private_access_ttl() -> u64 {
    300
}

fn default_biometric_mode() -> BiometricMode {
    BiometricMode::Disabled
}
