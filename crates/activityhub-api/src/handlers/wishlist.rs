//! Wishlist handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;

use activityhub_entity::wishlist::WishlistItem;

use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, PaginationParams, parse_uuid};
use crate::state::AppState;

/// GET /api/wishlist
pub async fn list_wishlist(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<WishlistItem>>>> {
    let result = state
        .services
        .wishlist
        .list_wishlist(&user, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// POST /api/wishlist/{activity_id}
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(activity_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WishlistItem>>)> {
    let item = state
        .services
        .wishlist
        .add_to_wishlist(&user, parse_uuid(&activity_id)?)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item))))
}

/// DELETE /api/wishlist/{activity_id}
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(activity_id): Path<String>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let activity_id = parse_uuid(&activity_id)?;
    state
        .services
        .wishlist
        .remove_from_wishlist(&user, activity_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        json!({ "activity_id": activity_id }),
        "Removed from wishlist",
    )))
}
