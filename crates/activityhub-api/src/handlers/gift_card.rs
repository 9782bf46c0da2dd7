//! Gift card handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use activityhub_entity::gift_card::GiftCard;
use activityhub_service::GiftCardBalance;

use crate::dto::request::{IssueGiftCardRequest, PurchaseGiftCardRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/gift-cards
pub async fn purchase_gift_card(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<PurchaseGiftCardRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<GiftCard>>)> {
    let card = state
        .services
        .gift_cards
        .purchase_gift_card(&user, req.amount_cents, &req.currency)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(card))))
}

/// POST /api/admin/gift-cards
pub async fn issue_gift_card(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<IssueGiftCardRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<GiftCard>>)> {
    let card = state
        .services
        .gift_cards
        .issue_gift_card(&user, req.amount_cents, &req.currency, req.expires_at)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(card))))
}

/// GET /api/gift-cards/{code}/balance
pub async fn check_balance(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(code): Path<String>,
) -> ApiResult<Json<ApiResponse<GiftCardBalance>>> {
    let balance = state
        .services
        .gift_cards
        .check_balance(&user, &code)
        .await?;
    Ok(Json(ApiResponse::ok(balance)))
}
