//! Trash handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use locker_core::types::MarkerId;
use locker_entity::trash::{DeletedDocument, TrashedDocument};
use locker_service::trash::PurgeSummary;

use crate::dto::request::{DocumentPathRequest, PurgeRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/trash
pub async fn list_trash(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<TrashedDocument>>>> {
    let items = state.trash_service.list_trashed(&auth).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// POST /api/trash
pub async fn move_to_trash(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DocumentPathRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DeletedDocument>>)> {
    req.validate()?;
    let marker = state.trash_service.move_to_trash(&auth, &req.path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(marker))))
}

/// POST /api/trash/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MarkerId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.trash_service.restore(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Document restored"))))
}

/// DELETE /api/trash/{id}
pub async fn permanently_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MarkerId>,
) -> ApiResult<Json<ApiResponse<DeletedDocument>>> {
    let outcome = state.trash_service.permanently_delete(&auth, id).await?;
    Ok(Json(ApiResponse::from_outcome(outcome)))
}

/// POST /api/trash/purge
pub async fn purge(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<PurgeRequest>>,
) -> ApiResult<Json<ApiResponse<PurgeSummary>>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()?;
    let outcome = state.trash_service.purge(&auth, req.days).await?;
    Ok(Json(ApiResponse::from_outcome(outcome)))
}
