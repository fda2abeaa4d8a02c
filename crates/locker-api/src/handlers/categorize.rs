//! Categorization handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use locker_entity::categorization::CategorySuggestion;
use locker_service::categorize::{AutoAssignment, BulkCategorization};

use crate::dto::request::SuggestRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/categorize/suggest
pub async fn suggest(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SuggestRequest>,
) -> ApiResult<Json<ApiResponse<CategorySuggestion>>> {
    req.validate()?;
    let suggestion = state.categorize_service.suggest(&auth, &req.filename).await?;
    Ok(Json(ApiResponse::ok(suggestion)))
}

/// POST /api/categorize/bulk
pub async fn bulk_categorize(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<BulkCategorization>>> {
    let outcome = state.categorize_service.bulk_categorize(&auth).await?;
    Ok(Json(ApiResponse::from_outcome(outcome)))
}

/// POST /api/folders/auto-assign
pub async fn auto_assign(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<AutoAssignment>>> {
    let outcome = state.categorize_service.auto_assign(&auth).await?;
    Ok(Json(ApiResponse::from_outcome(outcome)))
}
