//! Private-access handlers.

use axum::Json;
use axum::extract::State;

use locker_auth::{BiometricAssertion, IssuedGrant};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/private-access: exchange a device biometric assertion
/// for a short-lived grant sent back in `X-Private-Access`
pub async fn private_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(assertion): Json<BiometricAssertion>,
) -> ApiResult<Json<ApiResponse<IssuedGrant>>> {
    let grant = state.private_access.unlock(auth.user_id, &assertion).await?;
    Ok(Json(ApiResponse::ok(grant)))
}
