//! Active document handlers: list, upload, signed URL, recategorize, delete.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use validator::Validate;

use locker_core::error::AppError;
use locker_entity::{Category, DocumentEntry};
use locker_service::document::{DeletionKind, UploadDocument};

use crate::dto::request::{DocumentPathQuery, RecategorizeRequest};
use crate::dto::response::{ApiResponse, UrlResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<DocumentEntry>>>> {
    let documents = state.document_service.list_active(&auth).await?;
    Ok(Json(ApiResponse::ok(documents)))
}

/// POST /api/documents: multipart upload with `file`, `category` and
/// `is_private` fields
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<DocumentEntry>>)> {
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut category = Category::Other;
    let mut is_private = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(String::from);
                data = Some(field.bytes().await.map_err(multipart_error)?);
            }
            "category" => {
                category = Category::parse(&field.text().await.map_err(multipart_error)?);
            }
            "is_private" => {
                let text = field.text().await.map_err(multipart_error)?;
                is_private = parse_flag(&text)?;
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("Missing 'file' field"))?;
    let file_name = file_name.unwrap_or_default();

    let entry = state
        .document_service
        .upload(
            &auth,
            UploadDocument {
                file_name,
                category,
                is_private,
                data,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

/// GET /api/documents/url?path=
pub async fn document_url(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DocumentPathQuery>,
) -> ApiResult<Json<ApiResponse<UrlResponse>>> {
    query.validate()?;
    let url = state.document_service.document_url(&auth, &query.path).await?;
    Ok(Json(ApiResponse::ok(UrlResponse {
        path: query.path,
        url,
    })))
}

/// PUT /api/documents/category
pub async fn recategorize_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RecategorizeRequest>,
) -> ApiResult<Json<ApiResponse<DocumentEntry>>> {
    req.validate()?;
    let outcome = state
        .document_service
        .recategorize(&auth, &req.path, &Category::parse(&req.category))
        .await?;
    Ok(Json(ApiResponse::from_outcome(outcome)))
}

/// DELETE /api/documents?path=: trash, or immediate removal for private
/// documents
pub async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DocumentPathQuery>,
) -> ApiResult<Json<ApiResponse<DeletionKind>>> {
    query.validate()?;
    let outcome = state.document_service.delete(&auth, &query.path).await?;
    Ok(Json(ApiResponse::from_outcome(outcome)))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Upload exceeds the maximum allowed size")
    } else {
        AppError::validation(format!("Multipart error: {e}"))
    }
}

fn parse_flag(text: &str) -> Result<bool, AppError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        other => Err(AppError::validation(format!("Invalid is_private value '{other}'"))),
    }
}
