//! Provider selection from configuration.

use std::path::Path;
use std::sync::Arc;

use locker_core::config::{StorageConfig, StorageProviderKind};
use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::traits::storage::StorageProvider;

use crate::providers::{LocalStorageProvider, MemoryStorageProvider};
use crate::signing::UrlSigner;

/// Build the provider backing the document bucket. `public_base_url` is
/// where this server is reachable; it roots the URLs signed for the local
/// and memory providers.
pub async fn build_provider(
    config: &StorageConfig,
    public_base_url: &str,
) -> AppResult<Arc<dyn StorageProvider>> {
    if config.bucket.trim().is_empty() {
        return Err(AppError::configuration("storage.bucket must not be empty"));
    }
    let signer = UrlSigner::new(&config.url_signing_secret, public_base_url);

    let provider: Arc<dyn StorageProvider> = match config.provider {
        StorageProviderKind::Local => {
            let root = Path::new(&config.local.root_path).join(&config.bucket);
            Arc::new(LocalStorageProvider::new(root, signer).await?)
        }
        StorageProviderKind::Memory => Arc::new(MemoryStorageProvider::new(signer)),
        #[cfg(feature = "s3")]
        StorageProviderKind::S3 => Arc::new(
            crate::providers::S3StorageProvider::from_config(&config.bucket, &config.s3).await?,
        ),
        #[cfg(not(feature = "s3"))]
        StorageProviderKind::S3 => {
            return Err(AppError::configuration(
                "S3 storage requested but locker-storage was built without the `s3` feature",
            ));
        }
    };

    tracing::info!(
        provider = provider.provider_type(),
        bucket = %config.bucket,
        "Storage provider ready"
    );
    Ok(provider)
}
