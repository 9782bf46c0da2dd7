//! Activity provider handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use activityhub_entity::provider::ActivityProvider;

use crate::dto::request::{CreateProviderRequest, UpdateProviderRequest};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, PaginationParams, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/providers
pub async fn register_provider(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateProviderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ActivityProvider>>)> {
    let provider = state
        .services
        .providers
        .register_provider(&user, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(provider))))
}

/// GET /api/providers
pub async fn list_providers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<ActivityProvider>>>> {
    let page = state
        .services
        .providers
        .list_providers(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/providers/mine
pub async fn list_my_providers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<ActivityProvider>>>> {
    let providers = state.services.providers.list_my_providers(&user).await?;
    Ok(Json(ApiResponse::ok(providers)))
}

/// GET /api/providers/{id}
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ActivityProvider>>> {
    let provider = state.services.providers.get_provider(parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(provider)))
}

/// PUT /api/providers/{id}
pub async fn update_provider(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProviderRequest>,
) -> ApiResult<Json<ApiResponse<ActivityProvider>>> {
    let provider = state
        .services
        .providers
        .update_provider(&user, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(provider)))
}

/// POST /api/providers/{id}/verify
pub async fn verify_provider(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ActivityProvider>>> {
    let provider = state
        .services
        .providers
        .verify_provider(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(provider, "Provider verified")))
}
