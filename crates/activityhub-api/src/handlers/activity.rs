//! Activity handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;

use activityhub_entity::activity::Activity;

use crate::dto::request::{CreateActivityRequest, UpdateActivityRequest};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{
    ActivityListParams, CurrentUser, PaginationParams, ValidatedJson, parse_uuid,
};
use crate::state::AppState;

/// GET /api/activities
pub async fn list_published(
    State(state): State<AppState>,
    Query(params): Query<ActivityListParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Activity>>>> {
    let (page, category) = params.into_parts();
    let result = state
        .services
        .activities
        .list_published(&page, category.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// POST /api/providers/{id}/activities
pub async fn create_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(provider_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateActivityRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Activity>>)> {
    let activity = state
        .services
        .activities
        .create_activity(&user, parse_uuid(&provider_id)?, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(activity))))
}

/// GET /api/providers/{id}/activities
pub async fn list_provider_activities(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(provider_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Activity>>>> {
    let result = state
        .services
        .activities
        .list_provider_activities(&user, parse_uuid(&provider_id)?, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/activities/{id}
pub async fn get_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Activity>>> {
    let activity = state
        .services
        .activities
        .get_activity(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(activity)))
}

/// PUT /api/activities/{id}
pub async fn update_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateActivityRequest>,
) -> ApiResult<Json<ApiResponse<Activity>>> {
    let activity = state
        .services
        .activities
        .update_activity(&user, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(activity)))
}

/// POST /api/activities/{id}/publish
pub async fn publish_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Activity>>> {
    let activity = state
        .services
        .activities
        .publish_activity(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(activity, "Activity published")))
}

/// POST /api/activities/{id}/archive
pub async fn archive_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Activity>>> {
    let activity = state
        .services
        .activities
        .archive_activity(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(activity, "Activity archived")))
}

/// DELETE /api/activities/{id}
pub async fn delete_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let id = parse_uuid(&id)?;
    state.services.activities.delete_activity(&user, id).await?;
    Ok(Json(ApiResponse::with_message(
        json!({ "id": id }),
        "Activity deleted",
    )))
}
