//! Smart folder and assignment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use locker_core::types::SmartFolderId;
use locker_entity::folder::{FolderAssignment, SmartFolder};
use locker_service::folder::UpdateFolderRequest;

use crate::dto::request::{AssignRequest, AssignmentQuery, CreateFolderBody, DocumentPathQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<SmartFolder>>>> {
    let folders = state.folder_service.list_folders(&auth).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SmartFolder>>)> {
    req.validate()?;
    let folder = state.folder_service.create_folder(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// PUT /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SmartFolderId>,
    Json(req): Json<UpdateFolderRequest>,
) -> ApiResult<Json<ApiResponse<SmartFolder>>> {
    let folder = state.folder_service.update_folder(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SmartFolderId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.folder_service.delete_folder(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Folder deleted"))))
}

/// GET /api/folders/assignments?folder_id=
pub async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AssignmentQuery>,
) -> ApiResult<Json<ApiResponse<Vec<FolderAssignment>>>> {
    let assignments = state
        .folder_service
        .list_assignments(&auth, query.folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(assignments)))
}

/// PUT /api/folders/assignments
pub async fn assign(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Json<ApiResponse<FolderAssignment>>> {
    req.validate()?;
    let assignment = state
        .folder_service
        .assign(&auth, &req.document_path, req.folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(assignment)))
}

/// DELETE /api/folders/assignments?path=
pub async fn unassign(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DocumentPathQuery>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    query.validate()?;
    state.folder_service.unassign(&auth, &query.path).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Assignment removed"))))
}
