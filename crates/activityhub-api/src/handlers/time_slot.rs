//! Time slot handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use activityhub_entity::time_slot::TimeSlot;

use crate::dto::request::CreateTimeSlotRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/activities/{id}/time-slots
pub async fn add_time_slot(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(activity_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateTimeSlotRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TimeSlot>>)> {
    let slot = state
        .services
        .time_slots
        .add_time_slot(&user, parse_uuid(&activity_id)?, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(slot))))
}

/// GET /api/activities/{id}/time-slots
pub async fn list_time_slots(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<TimeSlot>>>> {
    let slots = state
        .services
        .time_slots
        .list_time_slots(parse_uuid(&activity_id)?)
        .await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// POST /api/time-slots/{id}/cancel
pub async fn cancel_time_slot(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<TimeSlot>>> {
    let slot = state
        .services
        .time_slots
        .cancel_time_slot(&user, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::with_message(slot, "Time slot cancelled")))
}
