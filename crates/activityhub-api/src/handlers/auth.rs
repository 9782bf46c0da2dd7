//! Authentication handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use activityhub_auth::TokenPair;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.services.auth.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user.into(), "Registration successful")),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.services.auth.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(LoginResponse {
        user: result.user.into(),
        tokens: result.tokens,
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let tokens = state.services.auth.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let me = state.services.auth.current_user(&user).await?;
    Ok(Json(ApiResponse::ok(me.into())))
}
