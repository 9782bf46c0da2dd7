//! Integration tests for the booking lifecycle over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_booking_lifecycle_awards_points() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;
    let customer = app.customer("ana@example.com").await;

    let created = app.book(&customer, &activity_id, &slot_id, 2).await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["data"]["status"], "pending");
    assert_eq!(created.body["data"]["total_cents"], 9000);
    assert_eq!(created.body["data"]["amount_due_cents"], 9000);
    assert!(created.body["data"]["payment_reference"].is_string());
    let id = created.body["data"]["id"].as_str().expect("id").to_string();

    let slots = app
        .request(
            "GET",
            &format!("/api/activities/{activity_id}/time-slots"),
            None,
            None,
        )
        .await;
    assert_eq!(slots.body["data"][0]["booked_count"], 2);

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&provider))
        .await;
    assert_eq!(unread.body["data"]["count"], 1);

    for (step, status) in [
        ("confirm", "confirmed"),
        ("check-in", "checked_in"),
        ("complete", "completed"),
    ] {
        let response = app
            .request(
                "POST",
                &format!("/api/bookings/{id}/{step}"),
                None,
                Some(&provider),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{step}: {:?}", response.body);
        assert_eq!(response.body["data"]["status"], status);
    }

    let profile = app
        .request("GET", "/api/customers/me", None, Some(&customer))
        .await;
    assert_eq!(profile.body["data"]["loyalty_points"], 90);

    let mine = app.request("GET", "/api/bookings", None, Some(&customer)).await;
    assert_eq!(mine.body["data"]["total"], 1);
}

#[tokio::test]
async fn test_booking_requires_authentication() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({
                "activity_id": activity_id,
                "time_slot_id": slot_id,
                "participants": 1,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_overbooking_is_a_conflict() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;
    let ana = app.customer("ana@example.com").await;
    let ben = app.customer("ben@example.com").await;

    let first = app.book(&ana, &activity_id, &slot_id, 3).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.book(&ben, &activity_id, &slot_id, 2).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code(), "CONFLICT");

    let zero = app.book(&ben, &activity_id, &slot_id, 0).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cross_tenant_access_is_forbidden() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;
    let ana = app.customer("ana@example.com").await;
    let ben = app.customer("ben@example.com").await;
    let (rival, rival_provider_id) = app.provider("rival@example.com").await;

    let created = app.book(&ana, &activity_id, &slot_id, 1).await;
    let id = created.body["data"]["id"].as_str().expect("id").to_string();

    let peek = app
        .request("GET", &format!("/api/bookings/{id}"), None, Some(&ben))
        .await;
    assert_eq!(peek.status, StatusCode::FORBIDDEN);

    let confirm = app
        .request("POST", &format!("/api/bookings/{id}/confirm"), None, Some(&rival))
        .await;
    assert_eq!(confirm.status, StatusCode::FORBIDDEN);

    let list = app
        .request(
            "GET",
            &format!("/api/providers/{provider_id}/bookings"),
            None,
            Some(&rival),
        )
        .await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    let own = app
        .request(
            "GET",
            &format!("/api/providers/{rival_provider_id}/bookings"),
            None,
            Some(&rival),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["data"]["total"], 0);
}

#[tokio::test]
async fn test_cancel_releases_seats_and_blocks_confirm() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;
    let customer = app.customer("ana@example.com").await;

    let created = app.book(&customer, &activity_id, &slot_id, 4).await;
    let id = created.body["data"]["id"].as_str().expect("id").to_string();

    let cancelled = app
        .request(
            "POST",
            &format!("/api/bookings/{id}/cancel"),
            Some(json!({ "reason": "Weather" })),
            Some(&customer),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["status"], "cancelled");
    assert_eq!(cancelled.body["data"]["cancellation_reason"], "Weather");

    let confirm = app
        .request("POST", &format!("/api/bookings/{id}/confirm"), None, Some(&provider))
        .await;
    assert_eq!(confirm.status, StatusCode::UNPROCESSABLE_ENTITY);

    let rebook = app.book(&customer, &activity_id, &slot_id, 4).await;
    assert_eq!(rebook.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_slot_with_active_bookings_cannot_be_cancelled() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, slot_id) = app.bookable_activity(&provider, &provider_id).await;
    let customer = app.customer("ana@example.com").await;
    app.book(&customer, &activity_id, &slot_id, 1).await;

    let response = app
        .request(
            "POST",
            &format!("/api/time-slots/{slot_id}/cancel"),
            None,
            Some(&provider),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}
