//! Integration tests for gift cards.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_purchase_and_redeem_gift_card() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;
    let customer = app.customer("ana@example.com").await;

    let purchased = app
        .request(
            "POST",
            "/api/gift-cards",
            Some(json!({ "amount_cents": 5000, "currency": "EUR" })),
            Some(&customer),
        )
        .await;
    assert_eq!(purchased.status, StatusCode::CREATED, "{:?}", purchased.body);
    let code = purchased.body["data"]["code"]
        .as_str()
        .expect("code")
        .to_string();
    assert_eq!(code.len(), 16);

    let booked = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({
                "activity_id": activity_id,
                "time_slot_id": slot_id,
                "participants": 2,
                "gift_card_code": code,
            })),
            Some(&customer),
        )
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{:?}", booked.body);
    assert_eq!(booked.body["data"]["discount_cents"], 5000);
    assert_eq!(booked.body["data"]["amount_due_cents"], 4000);

    let balance = app
        .request(
            "GET",
            &format!("/api/gift-cards/{code}/balance"),
            None,
            Some(&customer),
        )
        .await;
    assert_eq!(balance.status, StatusCode::OK);
    assert_eq!(balance.body["data"]["balance_cents"], 0);
    assert_eq!(balance.body["data"]["is_usable"], false);
}

#[tokio::test]
async fn test_only_admins_issue_gift_cards() {
    let app = TestApp::new();
    let customer = app.customer("ana@example.com").await;
    let admin = app.admin().await;
    let body = json!({ "amount_cents": 2500, "currency": "EUR" });

    let denied = app
        .request("POST", "/api/admin/gift-cards", Some(body.clone()), Some(&customer))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let issued = app
        .request("POST", "/api/admin/gift-cards", Some(body), Some(&admin))
        .await;
    assert_eq!(issued.status, StatusCode::CREATED);
    assert_eq!(issued.body["data"]["balance_cents"], 2500);
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let app = TestApp::new();
    let customer = app.customer("ana@example.com").await;

    let response = app
        .request(
            "GET",
            "/api/gift-cards/NOSUCHCODE234567/balance",
            None,
            Some(&customer),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
