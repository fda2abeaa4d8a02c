//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use locker_auth::{JwtDecoder, PasswordHasher, PrivateAccessGate, build_verifier};
use locker_categorizer::Categorizer;
use locker_core::config::AppConfig;
use locker_core::traits::storage::StorageProvider;
use locker_database::store::{FolderStore, ShareStore, TrashStore};
use locker_service::{
    AccessService, CategorizeService, DocumentService, FolderService, ShareService, TrashService,
};
use locker_storage::UrlSigner;

/// The metadata stores backing the services.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Deletion markers.
    pub trash: Arc<dyn TrashStore>,
    /// Share links.
    pub shares: Arc<dyn ShareStore>,
    /// Smart folders and assignments.
    pub folders: Arc<dyn FolderStore>,
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Object storage provider
    pub storage: Arc<dyn StorageProvider>,
    /// Verifies signatures on `/objects` URLs
    pub url_signer: Arc<UrlSigner>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Private-access grant issuer and validator
    pub private_access: Arc<PrivateAccessGate>,

    // ── Services ─────────────────────────────────────────────
    /// Active documents
    pub document_service: Arc<DocumentService>,
    /// Trash
    pub trash_service: Arc<TrashService>,
    /// Share management
    pub share_service: Arc<ShareService>,
    /// Public share resolution
    pub access_service: Arc<AccessService>,
    /// Smart folders
    pub folder_service: Arc<FolderService>,
    /// Categorization
    pub categorize_service: Arc<CategorizeService>,
}

impl AppState {
    /// Wires every service over the given stores, storage provider and
    /// categorizer.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        storage: Arc<dyn StorageProvider>,
        categorizer: Arc<dyn Categorizer>,
    ) -> Self {
        let signed_url_ttl = Duration::from_secs(config.storage.signed_url_ttl_seconds);
        let hasher = Arc::new(PasswordHasher::new());

        let trash_service = Arc::new(TrashService::new(
            Arc::clone(&storage),
            Arc::clone(&stores.trash),
            Arc::clone(&stores.shares),
            Arc::clone(&stores.folders),
            signed_url_ttl,
            config.trash.retention_days,
        ));
        let document_service = Arc::new(DocumentService::new(
            Arc::clone(&storage),
            Arc::clone(&stores.shares),
            Arc::clone(&stores.folders),
            Arc::clone(&trash_service),
            &config.storage,
        ));
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&stores.shares),
            Arc::clone(&document_service),
            Arc::clone(&hasher),
            config.share_link_base(),
            config.sharing.max_expiry_hours,
        ));
        let access_service = Arc::new(AccessService::new(
            Arc::clone(&stores.shares),
            Arc::clone(&stores.trash),
            Arc::clone(&storage),
            Arc::clone(&hasher),
            signed_url_ttl,
        ));
        let folder_service = Arc::new(FolderService::new(
            Arc::clone(&stores.folders),
            Arc::clone(&document_service),
        ));
        let categorize_service = Arc::new(CategorizeService::new(
            Arc::clone(&document_service),
            Arc::clone(&stores.folders),
            categorizer,
            &config.categorizer,
        ));

        let url_signer = Arc::new(UrlSigner::new(
            &config.storage.url_signing_secret,
            config.server.base_url(),
        ));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let private_access = Arc::new(PrivateAccessGate::new(
            &config.auth,
            build_verifier(config.auth.biometric_mode),
        ));

        Self {
            config: Arc::new(config),
            storage,
            url_signer,
            jwt_decoder,
            private_access,
            document_service,
            trash_service,
            share_service,
            access_service,
            folder_service,
            categorize_service,
        }
    }
}
