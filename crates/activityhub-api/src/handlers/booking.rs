//! Booking handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use activityhub_entity::booking::Booking;

use crate::dto::request::{CancelBookingRequest, CreateBookingRequest};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, PaginationParams, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let booking = state
        .services
        .bookings
        .create_booking(&user, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Booking>>>> {
    let result = state
        .services
        .bookings
        .list_my_bookings(&user, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/providers/{id}/bookings
pub async fn list_provider_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(provider_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Booking>>>> {
    let result = state
        .services
        .bookings
        .list_provider_bookings(&user, parse_uuid(&provider_id)?, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .services
        .bookings
        .get_booking(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .services
        .bookings
        .confirm_booking(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(booking, "Booking confirmed")))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CancelBookingRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .services
        .bookings
        .cancel_booking(&user, parse_uuid(&id)?, req.reason)
        .await?;
    Ok(Json(ApiResponse::with_message(booking, "Booking cancelled")))
}

/// POST /api/bookings/{id}/check-in
pub async fn check_in_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .services
        .bookings
        .check_in_booking(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .services
        .bookings
        .complete_booking(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(booking, "Booking completed")))
}
