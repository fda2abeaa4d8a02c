//! In-process object store.
//!
//! Emulates prefix listing over a flat key space the way S3 does with a
//! `/` delimiter. Deletes can be switched to fail so callers' best-effort
//! cleanup paths can be exercised.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

use crate::mime::mime_from_path;
use crate::signing::UrlSigner;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime<Utc>,
}

/// Object store held in memory.
#[derive(Debug)]
pub struct MemoryStorageProvider {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    signer: UrlSigner,
    fail_deletes: AtomicBool,
}

impl MemoryStorageProvider {
    /// Create an empty store.
    pub fn new(signer: UrlSigner) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            signer,
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent delete fail with a storage error.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn check_deletes(&self, path: &str) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Failed to delete object: {path}")));
        }
        Ok(())
    }
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn object_meta(path: &str, object: &StoredObject) -> StorageObjectMeta {
    StorageObjectMeta {
        path: path.to_string(),
        size_bytes: object.data.len() as u64,
        mime_type: mime_from_path(path),
        last_modified: Some(object.last_modified),
        is_directory: false,
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self.read_bytes(path).await?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let objects = self.objects.read().await;
        objects
            .get(normalize(path))
            .map(|o| o.data.clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        objects.insert(
            normalize(path).to_string(),
            StoredObject {
                data,
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.check_deletes(path)?;
        self.objects.write().await.remove(normalize(path));
        Ok(())
    }

    async fn delete_many(&self, paths: &[String]) -> AppResult<()> {
        if let Some(first) = paths.first() {
            self.check_deletes(first)?;
        }
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(normalize(path));
        }
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        let object = objects
            .get(normalize(from))
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {from}")))?;
        objects.insert(normalize(to).to_string(), object);
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        let object = objects
            .remove(normalize(from))
            .ok_or_else(|| AppError::not_found(format!("Object not found: {from}")))?;
        objects.insert(normalize(to).to_string(), object);
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.read().await.contains_key(normalize(path)))
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let objects = self.objects.read().await;
        let key = normalize(path);
        objects
            .get(key)
            .map(|o| object_meta(key, o))
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let prefix = prefix.trim_matches('/');
        let scan = if prefix.is_empty() {
            String::new()
        } else {
            format!("{prefix}/")
        };

        let objects = self.objects.read().await;
        let mut files = Vec::new();
        let mut directories = BTreeSet::new();
        for (key, object) in objects.range(scan.clone()..) {
            let Some(rest) = key.strip_prefix(&scan) else {
                break;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    directories.insert(format!("{scan}{child}"));
                }
                None => files.push(object_meta(key, object)),
            }
        }

        files.extend(directories.into_iter().map(|path| StorageObjectMeta {
            path,
            size_bytes: 0,
            mime_type: None,
            last_modified: None,
            is_directory: true,
        }));
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        self.signer.signed_url(normalize(path), ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemoryStorageProvider {
        MemoryStorageProvider::new(UrlSigner::new("secret", "http://localhost"))
    }

    #[tokio::test]
    async fn test_list_emulates_delimiter() {
        let store = provider();
        store.write("u/1_legal_a.pdf", Bytes::from("a")).await.unwrap();
        store.write("u/private/2_private_b.pdf", Bytes::from("b")).await.unwrap();
        store.write("u/private/3_private_c.pdf", Bytes::from("c")).await.unwrap();
        store.write("other/x.pdf", Bytes::from("x")).await.unwrap();
        store.write("ua/y.pdf", Bytes::from("y")).await.unwrap();

        let entries = store.list("u").await.unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["u/1_legal_a.pdf", "u/private"]);
        assert!(entries[1].is_directory);

        let private = store.list("u/private/").await.unwrap();
        assert_eq!(private.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok_and_failure_switch() {
        let store = provider();
        store.delete("u/none").await.unwrap();

        store.write("u/a", Bytes::from("a")).await.unwrap();
        store.set_fail_deletes(true);
        assert!(store.delete("u/a").await.is_err());
        assert!(store.exists("u/a").await.unwrap());

        store.set_fail_deletes(false);
        store.delete_many(&["u/a".to_string()]).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_rename_moves_object() {
        let store = provider();
        store.write("u/a", Bytes::from("a")).await.unwrap();
        store.rename("u/a", "u/b").await.unwrap();
        assert!(!store.exists("u/a").await.unwrap());
        assert_eq!(store.read_bytes("u/b").await.unwrap(), Bytes::from("a"));
        assert!(store.rename("u/a", "u/c").await.unwrap_err().is_not_found());
    }
}
