//! Customer profile handlers.

use axum::Json;
use axum::extract::State;

use activityhub_entity::customer::Customer;

use crate::dto::request::UpdateCustomerRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/customers/me
pub async fn get_my_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    let profile = state.services.customers.get_my_profile(&user).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/customers/me
pub async fn update_my_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateCustomerRequest>,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    let profile = state
        .services
        .customers
        .update_my_profile(&user, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}
