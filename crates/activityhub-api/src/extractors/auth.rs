//! `CurrentUser` extractor: resolves the caller from the bearer token.
//!
//! A request without an `Authorization` header yields an anonymous
//! context so public endpoints and services decide for themselves. A
//! header that is present but malformed, expired, or not an access token
//! is rejected with 401 before the handler runs, as is a valid token whose
//! account has since been deactivated or deleted.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use activityhub_core::error::AppError;
use activityhub_core::traits::Repository;
use activityhub_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's request context.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl CurrentUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(CurrentUser(RequestContext::anonymous(ip_address)));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(token)?;

        let user = state
            .stores
            .users
            .find_by_id(&claims.user_id())
            .await?
            .filter(|u| u.can_login())
            .ok_or_else(|| AppError::authentication("Account is no longer active"))?;

        Ok(CurrentUser(RequestContext::authenticated(
            user.id,
            user.role,
            user.email,
            ip_address,
        )))
    }
}
