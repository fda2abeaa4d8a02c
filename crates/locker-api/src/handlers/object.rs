//! Signed object downloads served by this process.
//!
//! Local and in-memory providers hand out URLs pointing here; S3 URLs go
//! straight to the bucket.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use chrono::Utc;

use locker_core::error::AppError;
use locker_storage::mime::mime_from_path;

use crate::dto::request::SignedObjectQuery;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /objects/{*key}?expires=&signature=
pub async fn download_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<SignedObjectQuery>,
) -> ApiResult<Response> {
    state
        .url_signer
        .verify(&key, query.expires, &query.signature, Utc::now())?;

    let meta = state.storage.metadata(&key).await?;
    let stream = state.storage.read(&key).await?;
    let file_name = key.rsplit('/').next().unwrap_or(&key).replace('"', "");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            mime_from_path(&key).unwrap_or_else(|| "application/octet-stream".to_string()),
        )
        .header(header::CONTENT_LENGTH, meta.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        )
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
