//! Location and location request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use activityhub_entity::location::{Location, LocationRequest};

use crate::dto::request::{LocationRequestBody, RejectLocationRequest};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, PaginationParams, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/providers/{id}/location-requests
pub async fn submit_location_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(provider_id): Path<String>,
    ValidatedJson(req): ValidatedJson<LocationRequestBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LocationRequest>>)> {
    let request = state
        .services
        .locations
        .submit_location_request(&user, parse_uuid(&provider_id)?, req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(request, "Location request submitted")),
    ))
}

/// GET /api/providers/{id}/location-requests
pub async fn list_provider_location_requests(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(provider_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<LocationRequest>>>> {
    let result = state
        .services
        .locations
        .list_my_location_requests(&user, parse_uuid(&provider_id)?, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/admin/location-requests
pub async fn list_pending_location_requests(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<LocationRequest>>>> {
    let result = state
        .services
        .locations
        .list_pending_location_requests(&user, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// POST /api/admin/location-requests/{id}/approve
pub async fn approve_location_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<LocationRequest>>> {
    let request = state
        .services
        .locations
        .approve_location_request(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(request, "Location approved")))
}

/// POST /api/admin/location-requests/{id}/reject
pub async fn reject_location_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RejectLocationRequest>,
) -> ApiResult<Json<ApiResponse<LocationRequest>>> {
    let request = state
        .services
        .locations
        .reject_location_request(&user, parse_uuid(&id)?, &req.note)
        .await?;
    Ok(Json(ApiResponse::with_message(request, "Location rejected")))
}

/// GET /api/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Location>>>> {
    let result = state
        .services
        .locations
        .list_locations(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/locations/{id}
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Location>>> {
    let location = state.services.locations.get_location(parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(location)))
}
