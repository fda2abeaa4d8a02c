//! Signed URLs for objects served by this process.
//!
//! The local and memory providers cannot hand out presigned URLs the way
//! S3 does, so they point at `{base}/objects/{key}` with an expiry and an
//! HMAC-SHA256 signature over the key and expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use locker_core::error::AppError;
use locker_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies object URLs.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
    base_url: String,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Create a signer for URLs rooted at `base_url`.
    pub fn new(secret: &str, base_url: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn mac(&self, path: &str, expires: i64) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid URL signing key: {e}")))?;
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    /// Hex signature for `path` valid until `expires` (unix seconds).
    pub fn sign(&self, path: &str, expires: i64) -> AppResult<String> {
        Ok(hex::encode(self.mac(path, expires)?.finalize().into_bytes()))
    }

    /// Build a signed URL for `path` that expires `ttl` from now.
    pub fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::validation(format!("Invalid URL lifetime: {e}")))?;
        let expires = (Utc::now() + ttl).timestamp();
        let signature = self.sign(path, expires)?;
        Ok(format!(
            "{}/objects/{}?expires={expires}&signature={signature}",
            self.base_url,
            encode_key(path)
        ))
    }

    /// Check a signature presented with a request at `now`.
    pub fn verify(&self, path: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> AppResult<()> {
        if expires <= now.timestamp() {
            return Err(AppError::authorization("Signed URL has expired"));
        }
        let provided = hex::decode(signature)
            .map_err(|_| AppError::authorization("Malformed URL signature"))?;
        self.mac(path, expires)?
            .verify_slice(&provided)
            .map_err(|_| AppError::authorization("Invalid URL signature"))
    }
}

/// Percent-encode each segment of an object key, keeping the separators.
pub fn encode_key(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
