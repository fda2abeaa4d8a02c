//! `AuthUser` extractor: pulls the bearer token and the optional
//! private-access grant from the headers, validates both, and injects the
//! request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use locker_core::error::AppError;
use locker_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the private-access grant.
pub const PRIVATE_ACCESS_HEADER: &str = "x-private-access";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = header(parts, "authorization")
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(token)?;

        let ip_address = header(parts, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let user_agent = header(parts, "user-agent").map(String::from);

        let mut ctx = RequestContext::new(claims.user_id(), claims.email, ip_address, user_agent);

        if let Some(grant) = header(parts, PRIVATE_ACCESS_HEADER) {
            let grant = state.private_access.validate(grant.trim(), ctx.user_id)?;
            ctx = ctx.with_private_access(grant);
        }

        Ok(AuthUser(ctx))
    }
}
