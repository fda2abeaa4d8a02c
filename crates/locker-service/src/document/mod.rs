//! Active documents: listing, upload, signed URLs, recategorization and
//! deletion.

pub mod reconcile;
pub mod service;

pub use service::{DeletionKind, DocumentService, UploadDocument};

use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_entity::document::DocumentPath;

use crate::context::RequestContext;

/// Decode `raw` and check it belongs to the caller.
pub(crate) fn owned_path(ctx: &RequestContext, raw: &str) -> AppResult<DocumentPath> {
    let path = DocumentPath::parse(raw)?;
    if !path.is_owned_by(&ctx.user_id) {
        return Err(AppError::authorization(
            "Document does not belong to the current user",
        ));
    }
    Ok(path)
}
