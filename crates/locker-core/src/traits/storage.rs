//! Object storage trait for pluggable document backends.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Key within the bucket.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this entry is a directory (or a common prefix).
    pub is_directory: bool,
}

impl StorageObjectMeta {
    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for object storage backends.
///
/// Keys are bucket-relative, `/`-separated paths such as
/// `{user}/{timestamp}_{category}_{name}.pdf`. The [`StorageProvider`]
/// trait is defined here in `locker-core` and implemented in
/// `locker-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read an object and return its byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Read an object into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to an object, replacing any existing content.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Delete several objects in one call where the backend allows it.
    async fn delete_many(&self, paths: &[String]) -> AppResult<()> {
        for path in paths {
            self.delete(path).await?;
        }
        Ok(())
    }

    /// Copy an object to a new key.
    async fn copy(&self, from: &str, to: &str) -> AppResult<()>;

    /// Move an object to a new key.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about an object. Missing objects yield a not-found error.
    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta>;

    /// List the immediate children of a prefix. Nested prefixes are
    /// reported as directory entries.
    async fn list(&self, prefix: &str) -> AppResult<Vec<StorageObjectMeta>>;

    /// Produce a time-limited URL through which the object can be fetched
    /// without credentials.
    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String>;
}
