//! Request context carrying the caller's identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_entity::user::UserRole;

/// Context for the current request.
///
/// Built by the API layer from the bearer token. Anonymous requests carry
/// no user id; services that need a caller reject them through
/// [`RequestContext::require_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Option<Uuid>,
    /// The user's role at the time the token was issued.
    pub role: Option<UserRole>,
    /// Email from the token claims.
    pub email: Option<String>,
    /// IP address of the request origin.
    pub ip_address: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// A context with no authenticated user.
    pub fn anonymous(ip_address: impl Into<String>) -> Self {
        Self {
            user_id: None,
            role: None,
            email: None,
            ip_address: ip_address.into(),
            request_time: Utc::now(),
        }
    }

    /// A context for an authenticated user.
    pub fn authenticated(
        user_id: Uuid,
        role: UserRole,
        email: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(role),
            email: Some(email.into()),
            ip_address: ip_address.into(),
            request_time: Utc::now(),
        }
    }

    /// The caller's user id, or an authentication error.
    pub fn require_user(&self) -> AppResult<Uuid> {
        self.user_id
            .ok_or_else(|| AppError::authentication("User is not authenticated"))
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_admin())
    }

    /// The caller's user id if they are an admin.
    pub fn require_admin(&self) -> AppResult<Uuid> {
        let user_id = self.require_user()?;
        if !self.is_admin() {
            return Err(AppError::authorization("Administrator role required"));
        }
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;

    use super::*;

    #[test]
    fn test_anonymous_is_rejected() {
        let ctx = RequestContext::anonymous("127.0.0.1");
        let err = ctx.require_user().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "User is not authenticated");
    }

    #[test]
    fn test_admin_check() {
        let ctx = RequestContext::authenticated(Uuid::new_v4(), UserRole::Customer, "a@b.c", "::1");
        assert!(!ctx.is_admin());
        assert_eq!(ctx.require_admin().unwrap_err().kind, ErrorKind::Authorization);
    }
}
