//! Request context carrying the authenticated user and any private-access
//! grant presented with the request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use locker_auth::PrivateAccessGrant;
use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_core::types::UserId;

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Email from the bearer token, if present.
    pub email: Option<String>,
    /// Validated private-access grant, if one was presented.
    pub private_access: Option<PrivateAccessGrant>,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context without a private-access grant.
    pub fn new(
        user_id: UserId,
        email: Option<String>,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            email,
            private_access: None,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Attach a validated private-access grant.
    pub fn with_private_access(mut self, grant: PrivateAccessGrant) -> Self {
        self.private_access = Some(grant);
        self
    }

    /// Whether the request carries a live grant for this user.
    pub fn has_private_access(&self) -> bool {
        self.private_access
            .is_some_and(|g| g.user_id == self.user_id && g.expires_at > self.request_time)
    }

    /// Fail with an authorization error unless a live grant is present.
    pub fn require_private_access(&self) -> AppResult<()> {
        if self.has_private_access() {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Private documents require biometric verification",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_grant_must_match_user_and_be_live() {
        let user = UserId::new();
        let ctx = RequestContext::new(user, None, "127.0.0.1".into(), None);
        assert!(ctx.require_private_access().is_err());

        let live = ctx.clone().with_private_access(PrivateAccessGrant {
            user_id: user,
            expires_at: Utc::now() + Duration::minutes(5),
        });
        assert!(live.has_private_access());

        let foreign = ctx.clone().with_private_access(PrivateAccessGrant {
            user_id: UserId::new(),
            expires_at: Utc::now() + Duration::minutes(5),
        });
        assert!(!foreign.has_private_access());

        let stale = ctx.with_private_access(PrivateAccessGrant {
            user_id: user,
            expires_at: Utc::now() - Duration::minutes(5),
        });
        assert!(!stale.has_private_access());
    }
}
