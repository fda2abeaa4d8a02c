//! S3-compatible object storage provider.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream as S3ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use locker_core::config::storage::S3StorageConfig;
use locker_core::error::{AppError, ErrorKind};
use locker_core::result::AppResult;
use locker_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

use crate::mime::mime_from_path;
use crate::signing::encode_key;

/// Keys per `DeleteObjects` request.
const DELETE_BATCH: usize = 1000;

/// S3-compatible storage provider bound to one bucket.
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3StorageProvider {
    /// Build a client from configuration. Explicit keys take precedence
    /// over the default AWS credential chain.
    pub async fn from_config(bucket: &str, config: &S3StorageConfig) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket,
            "Initializing S3 storage provider"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "locker-config",
            ));
        }
        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self::new(aws_sdk_s3::Client::from_conf(s3_config), bucket))
    }

    /// Wrap an existing client.
    pub fn new(client: aws_sdk_s3::Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

fn storage_error<E>(message: String, e: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::with_source(ErrorKind::Storage, message, e)
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "S3 bucket is not reachable");
                Ok(false)
            }
        }
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    AppError::not_found(format!("Object not found: {path}"))
                } else {
                    storage_error(format!("Failed to get object '{path}'"), service_err)
                }
            })?;

        let stream = ReaderStream::new(output.body.into_async_read());
        Ok(Box::pin(stream.map(|r| r.map(Bytes::from))))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    AppError::not_found(format!("Object not found: {path}"))
                } else {
                    storage_error(format!("Failed to get object '{path}'"), service_err)
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| storage_error(format!("Failed to read body of '{path}'"), e))?;
        Ok(data.into_bytes())
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .set_content_type(mime_from_path(path))
            .body(S3ByteStream::from(data))
            .send()
            .await
            .map_err(|e| storage_error(format!("Failed to put object '{path}'"), e))?;

        debug!(path, bytes = len, "Wrote object");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| storage_error(format!("Failed to delete object '{path}'"), e))?;
        Ok(())
    }

    async fn delete_many(&self, paths: &[String]) -> AppResult<()> {
        for batch in paths.chunks(DELETE_BATCH) {
            let objects = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| storage_error("Invalid object key".to_string(), e))?;
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| storage_error("Invalid delete request".to_string(), e))?;

            let output = self
                .client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| storage_error("Failed to delete objects".to_string(), e))?;

            if let Some(failure) = output.errors().first() {
                return Err(AppError::storage(format!(
                    "Failed to delete object '{}': {}",
                    failure.key().unwrap_or_default(),
                    failure.message().unwrap_or("unknown error")
                )));
            }
        }
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, encode_key(from)))
            .key(to)
            .send()
            .await
            .map_err(|e| storage_error(format!("Failed to copy '{from}' -> '{to}'"), e))?;
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        self.copy(from, to).await?;
        self.delete(from).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(storage_error(format!("Failed to stat object '{path}'"), service_err))
                }
            }
        }
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    AppError::not_found(format!("Object not found: {path}"))
                } else {
                    storage_error(format!("Failed to stat object '{path}'"), service_err)
                }
            })?;

        Ok(StorageObjectMeta {
            path: path.to_string(),
            size_bytes: output.content_length().unwrap_or(0).max(0) as u64,
            mime_type: output
                .content_type()
                .map(str::to_string)
                .or_else(|| mime_from_path(path)),
            last_modified: output.last_modified().and_then(to_chrono),
            is_directory: false,
        })
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let prefix = prefix.trim_matches('/');
        let scan = if prefix.is_empty() {
            String::new()
        } else {
            format!("{prefix}/")
        };

        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&scan)
                .delimiter("/")
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| storage_error(format!("Failed to list prefix '{scan}'"), e))?;

            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                entries.push(StorageObjectMeta {
                    path: key.to_string(),
                    size_bytes: object.size().unwrap_or(0).max(0) as u64,
                    mime_type: mime_from_path(key),
                    last_modified: object.last_modified().and_then(to_chrono),
                    is_directory: key.ends_with('/'),
                });
            }
            for common in output.common_prefixes() {
                let Some(dir) = common.prefix() else { continue };
                entries.push(StorageObjectMeta {
                    path: dir.trim_end_matches('/').to_string(),
                    size_bytes: 0,
                    mime_type: None,
                    last_modified: None,
                    is_directory: true,
                });
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| storage_error("Invalid presigning lifetime".to_string(), e))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(|e| storage_error(format!("Failed to presign '{path}'"), e))?;
        Ok(request.uri().to_string())
    }
}
