//! Public share resolution.
//!
//! Every failure is reported as a [`ShareState`] rather than an error so
//! the public page can tell the visitor what happened. The checks run in
//! a fixed order: existence, visibility, expiry, then password, so an
//! expired share never resolves whatever password is supplied.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use locker_auth::password::PasswordHasher;
use locker_core::result::AppResult;
use locker_core::traits::storage::StorageProvider;
use locker_database::store::{ShareStore, TrashStore};
use locker_entity::document::DocumentPath;
use locker_entity::share::{DocumentShare, ShareState, SharedDocumentView};

use crate::document::reconcile::TrashIndex;

/// Resolves share tokens for anonymous visitors.
#[derive(Debug, Clone)]
pub struct AccessService {
    share_store: Arc<dyn ShareStore>,
    trash_store: Arc<dyn TrashStore>,
    storage: Arc<dyn StorageProvider>,
    hasher: Arc<PasswordHasher>,
    signed_url_ttl: Duration,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        share_store: Arc<dyn ShareStore>,
        trash_store: Arc<dyn TrashStore>,
        storage: Arc<dyn StorageProvider>,
        hasher: Arc<PasswordHasher>,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            share_store,
            trash_store,
            storage,
            hasher,
            signed_url_ttl,
        }
    }

    /// Resolves a token without a password.
    pub async fn resolve(&self, token: &str) -> AppResult<SharedDocumentView> {
        self.open(token, None).await
    }

    /// Resolves a password-protected token. A wrong password leaves the
    /// view locked with `invalid_password` set; nothing is persisted.
    pub async fn unlock(&self, token: &str, password: &str) -> AppResult<SharedDocumentView> {
        self.open(token, Some(password)).await
    }

    async fn open(&self, token: &str, password: Option<&str>) -> AppResult<SharedDocumentView> {
        let Some(share) = self.share_store.find_by_token(token).await? else {
            return Ok(SharedDocumentView::denied(ShareState::NotFound));
        };
        if !share.is_public {
            return Ok(SharedDocumentView::denied(ShareState::NotPublic));
        }
        if share.is_expired_at(Utc::now()) {
            return Ok(SharedDocumentView::denied(ShareState::Expired));
        }

        if let Some(hash) = share.password_hash.as_deref() {
            let matched = match password {
                Some(candidate) => self.hasher.verify_password(candidate, hash)?,
                None => false,
            };
            if !matched {
                let mut view = describe(&share, ShareState::Locked);
                view.invalid_password = password.is_some();
                return Ok(view);
            }
        }

        let Some(key) = self.locate(&share).await? else {
            return Ok(SharedDocumentView::denied(ShareState::Unavailable));
        };

        let url = self.storage.signed_url(&key, self.signed_url_ttl).await?;
        if let Err(e) = self.share_store.increment_access_count(share.id).await {
            warn!(share_id = %share.id, error = %e, "Failed to record share access");
        }

        debug!(share_id = %share.id, path = %key, "Share resolved");

        let mut view = describe(&share, ShareState::Resolved);
        view.url = Some(url);
        Ok(view)
    }

    /// First existing object among the stored key, the key without a
    /// leading slash, and the flat `{owner}/{basename}` key. Private and
    /// trashed documents never resolve.
    async fn locate(&self, share: &DocumentShare) -> AppResult<Option<String>> {
        let stored = share.document_path.as_str();
        let basename = stored.rsplit('/').next().unwrap_or(stored);
        let mut candidates = vec![
            stored.to_string(),
            stored.trim_start_matches('/').to_string(),
            format!("{}/{basename}", share.user_id),
        ];
        candidates.dedup();

        let markers = self.trash_store.list_for_user(share.user_id).await?;
        let index = TrashIndex::new(&markers);

        for key in candidates {
            let private = DocumentPath::parse(&key).is_ok_and(|p| p.requires_private_access());
            if private || index.contains(&key) {
                continue;
            }
            if self.storage.exists(&key).await? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

fn describe(share: &DocumentShare, state: ShareState) -> SharedDocumentView {
    let path = DocumentPath::parse(&share.document_path).ok();
    SharedDocumentView {
        state,
        display_name: path.as_ref().map(DocumentPath::display_name),
        category: path.map(|p| p.category().clone()),
        url: None,
        allow_download: share.allow_download,
        expires_at: share.expires_at,
        invalid_password: false,
    }
}
