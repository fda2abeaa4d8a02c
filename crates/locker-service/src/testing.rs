//! Service graph over in-memory stores for unit tests.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;

use locker_auth::{PasswordHasher, PrivateAccessGrant};
use locker_categorizer::HeuristicCategorizer;
use locker_core::config::{CategorizerConfig, StorageConfig};
use locker_core::traits::storage::StorageProvider;
use locker_core::types::UserId;
use locker_database::memory::{MemoryFolderStore, MemoryShareStore, MemoryTrashStore};
use locker_storage::UrlSigner;
use locker_storage::providers::memory::MemoryStorageProvider;

use crate::{
    AccessService, CategorizeService, DocumentService, FolderService, RequestContext,
    ShareService, TrashService,
};

pub(crate) struct Fixture {
    pub user: UserId,
    pub storage: Arc<MemoryStorageProvider>,
    pub trash_store: Arc<MemoryTrashStore>,
    pub share_store: Arc<MemoryShareStore>,
    pub folder_store: Arc<MemoryFolderStore>,
    pub hasher: Arc<PasswordHasher>,
    pub trash: Arc<TrashService>,
    pub documents: Arc<DocumentService>,
    pub shares: ShareService,
    pub access: AccessService,
    pub folders: Arc<FolderService>,
    pub categorize: CategorizeService,
}

impl Fixture {
    pub fn new() -> Self {
        let storage_config = StorageConfig {
            max_upload_size_bytes: 1024,
            ..Default::default()
        };
        let categorizer_config = CategorizerConfig {
            pacing_ms: 0,
            ..Default::default()
        };
        let ttl = Duration::from_secs(storage_config.signed_url_ttl_seconds);

        let storage = Arc::new(MemoryStorageProvider::new(UrlSigner::new(
            "test-secret",
            "https://locker.test",
        )));
        let trash_store = Arc::new(MemoryTrashStore::new());
        let share_store = Arc::new(MemoryShareStore::new());
        let folder_store = Arc::new(MemoryFolderStore::new());
        let hasher = Arc::new(PasswordHasher::new());

        let trash = Arc::new(TrashService::new(
            storage.clone(),
            trash_store.clone(),
            share_store.clone(),
            folder_store.clone(),
            ttl,
            30,
        ));
        let documents = Arc::new(DocumentService::new(
            storage.clone(),
            share_store.clone(),
            folder_store.clone(),
            trash.clone(),
            &storage_config,
        ));
        let shares = ShareService::new(
            share_store.clone(),
            documents.clone(),
            hasher.clone(),
            "https://locker.test",
            48,
        );
        let access = AccessService::new(
            share_store.clone(),
            trash_store.clone(),
            storage.clone(),
            hasher.clone(),
            ttl,
        );
        let folders = Arc::new(FolderService::new(folder_store.clone(), documents.clone()));
        let categorize = CategorizeService::new(
            documents.clone(),
            folder_store.clone(),
            Arc::new(HeuristicCategorizer::new()),
            &categorizer_config,
        );

        Self {
            user: UserId::new(),
            storage,
            trash_store,
            share_store,
            folder_store,
            hasher,
            trash,
            documents,
            shares,
            access,
            folders,
            categorize,
        }
    }

    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(self.user, None, "127.0.0.1".to_string(), None)
    }

    pub fn private_ctx(&self) -> RequestContext {
        self.ctx().with_private_access(PrivateAccessGrant {
            user_id: self.user,
            expires_at: Utc::now() + chrono::Duration::minutes(5),
        })
    }

    /// Key of `name` under the fixture user.
    pub fn key(&self, name: &str) -> String {
        format!("{}/{name}", self.user)
    }

    /// Store an object under the fixture user and return its key.
    pub async fn put(&self, name: &str, data: &[u8]) -> String {
        let key = self.key(name);
        self.storage
            .write(&key, Bytes::copy_from_slice(data))
            .await
            .unwrap();
        key
    }
}
