//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::json;

use activityhub_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, PaginationParams, parse_uuid};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Notification>>>> {
    let result = state
        .services
        .notifications
        .list_notifications(&user, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.services.notifications.unread_count(&user).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Notification>>> {
    let notification = state
        .services
        .notifications
        .mark_read(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let count = state.services.notifications.mark_all_read(&user).await?;
    Ok(Json(ApiResponse::ok(json!({ "marked": count }))))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let id = parse_uuid(&id)?;
    state
        .services
        .notifications
        .delete_notification(&user, id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        json!({ "id": id }),
        "Notification deleted",
    )))
}
