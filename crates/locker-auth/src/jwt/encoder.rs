//! JWT token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use locker_core::config::AuthConfig;
use locker_core::error::AppError;
use locker_core::types::UserId;

use super::claims::{Claims, TokenType};

/// Signs tokens with the shared HS256 secret.
///
/// In production the identity platform issues access tokens; this server
/// only issues private-access grants. Access tokens are minted here for
/// tests and local tooling.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer stamped on every token, when configured.
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
        }
    }

    fn claims(&self, user_id: UserId, ttl: Duration, token_type: TokenType) -> Claims {
        let now = Utc::now();
        Claims {
            sub: user_id.into_uuid(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            email: None,
            iss: self.issuer.clone(),
            jti: Some(Uuid::new_v4()),
            token_type,
        }
    }

    /// Signs arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Generates a bearer access token.
    pub fn issue_access_token(
        &self,
        user_id: UserId,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let mut claims = self.claims(user_id, ttl, TokenType::Access);
        claims.email = email.map(str::to_string);
        self.encode(&claims)
    }

    /// Generates a private-access grant for `user_id`.
    pub fn issue_private_access(
        &self,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = self.claims(user_id, ttl, TokenType::PrivateAccess);
        let expires_at = claims.expires_at();
        Ok((self.encode(&claims)?, expires_at))
    }
}
