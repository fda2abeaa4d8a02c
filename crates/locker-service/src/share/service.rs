//! Share CRUD service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use locker_auth::password::PasswordHasher;
use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::ShareId;
use locker_database::store::ShareStore;
use locker_entity::share::{CreateDocumentShare, ShareLink};

use super::link::LinkService;
use crate::context::RequestContext;
use crate::document::{DocumentService, owned_path};

/// Request to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// Object key of the document.
    pub document_path: String,
    /// Whether the link resolves for anonymous visitors.
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Hours until expiry; 0 means never.
    #[serde(default)]
    pub expires_in_hours: i64,
    /// Password protection (optional).
    #[serde(default)]
    pub password: Option<String>,
    /// Allow download.
    #[serde(default = "default_true")]
    pub allow_download: bool,
}

fn default_true() -> bool {
    true
}

/// Manages share creation, listing, and deletion.
#[derive(Debug, Clone)]
pub struct ShareService {
    share_store: Arc<dyn ShareStore>,
    documents: Arc<DocumentService>,
    link_service: LinkService,
    hasher: Arc<PasswordHasher>,
    link_base: String,
    max_expiry_hours: i64,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        share_store: Arc<dyn ShareStore>,
        documents: Arc<DocumentService>,
        hasher: Arc<PasswordHasher>,
        link_base: impl Into<String>,
        max_expiry_hours: i64,
    ) -> Self {
        Self {
            share_store,
            documents,
            link_service: LinkService::new(),
            hasher,
            link_base: link_base.into(),
            max_expiry_hours,
        }
    }

    /// Creates a new share link for an active, non-private document.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> AppResult<ShareLink> {
        if req.expires_in_hours < 0 {
            return Err(AppError::validation("expires_in_hours must not be negative"));
        }
        if req.password.as_deref().is_some_and(|p| p.is_empty()) {
            return Err(AppError::validation(
                "A password is required for password-protected shares",
            ));
        }

        let path = owned_path(ctx, &req.document_path)?;
        if path.requires_private_access() {
            return Err(AppError::authorization("Private documents cannot be shared"));
        }
        let path = self.documents.ensure_active(ctx, path.as_str()).await?;
        let expires_at = self.expiry(ctx, req.expires_in_hours)?;

        let password_hash = match req.password.as_deref() {
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };

        let share = self
            .share_store
            .create(&CreateDocumentShare {
                user_id: ctx.user_id,
                document_path: path.as_str().to_string(),
                share_token: self.link_service.generate_token(),
                is_public: req.is_public,
                expires_at,
                password_hash,
                allow_download: req.allow_download,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            path = %share.document_path,
            protected = share.requires_password(),
            "Share created"
        );

        Ok(ShareLink::new(&share, &self.link_base))
    }

    /// Expiry for a share created now. Zero hours means no expiry. A
    /// `max_expiry_hours` of zero or less leaves the requested lifetime
    /// uncapped.
    fn expiry(&self, ctx: &RequestContext, hours: i64) -> AppResult<Option<DateTime<Utc>>> {
        if hours == 0 {
            return Ok(None);
        }
        let hours = if self.max_expiry_hours > 0 {
            hours.min(self.max_expiry_hours)
        } else {
            hours
        };
        Duration::try_hours(hours)
            .and_then(|lifetime| ctx.request_time.checked_add_signed(lifetime))
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("expires_in_hours {hours} is out of range")))
    }

    /// Lists shares created by the current user.
    pub async fn list_shares(&self, ctx: &RequestContext) -> AppResult<Vec<ShareLink>> {
        let shares = self.share_store.list_for_user(ctx.user_id).await?;
        Ok(shares
            .iter()
            .map(|share| ShareLink::new(share, &self.link_base))
            .collect())
    }

    /// Deletes a share. This is the only way to disable a link.
    pub async fn delete_share(&self, ctx: &RequestContext, id: ShareId) -> AppResult<()> {
        if !self.share_store.delete(ctx.user_id, id).await? {
            return Err(AppError::not_found(format!("Share {id} not found")));
        }
        info!(user_id = %ctx.user_id, share_id = %id, "Share deleted");
        Ok(())
    }
}
