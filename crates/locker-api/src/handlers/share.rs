//! Share management and public share access handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use locker_core::types::ShareId;
use locker_entity::share::{ShareLink, SharedDocumentView};

use crate::dto::request::{CreateShareBody, UnlockShareRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ShareLink>>>> {
    let shares = state.share_service.list_shares(&auth).await?;
    Ok(Json(ApiResponse::ok(shares)))
}

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ShareLink>>)> {
    req.validate()?;
    let link = state.share_service.create_share(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link))))
}

/// DELETE /api/shares/{id}
pub async fn delete_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.share_service.delete_share(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Share deleted"))))
}

/// GET /shared/{token}: public share resolution
///
/// Answers 200 for every resolution state, unknown tokens included; the
/// outcome is in `data.state`.
pub async fn view_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<ApiResponse<SharedDocumentView>>> {
    let view = state.access_service.resolve(&token).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /shared/{token}/unlock: resolve a password-protected share
pub async fn unlock_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<UnlockShareRequest>,
) -> ApiResult<Json<ApiResponse<SharedDocumentView>>> {
    req.validate()?;
    let view = state.access_service.unlock(&token, &req.password).await?;
    Ok(Json(ApiResponse::ok(view)))
}
