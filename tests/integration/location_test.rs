//! Integration tests for location requests and moderation.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

fn venue() -> serde_json::Value {
    json!({
        "name": "North Pier",
        "address": "Pier 4",
        "city": "Lisbon",
        "country": "Portugal",
        "latitude": 38.7,
        "longitude": -9.1,
    })
}

#[tokio::test]
async fn test_approval_creates_location_and_notifies() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let admin = app.admin().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/providers/{provider_id}/location-requests"),
            Some(venue()),
            Some(&provider),
        )
        .await;
    assert_eq!(submitted.status, StatusCode::CREATED, "{:?}", submitted.body);
    assert_eq!(submitted.body["data"]["status"], "pending");
    let request_id = submitted.body["data"]["id"].as_str().expect("id").to_string();

    let pending = app
        .request("GET", "/api/admin/location-requests", None, Some(&admin))
        .await;
    assert_eq!(pending.body["data"]["total"], 1);

    let approved = app
        .request(
            "POST",
            &format!("/api/admin/location-requests/{request_id}/approve"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.body["data"]["status"], "approved");
    let location_id = approved.body["data"]["location_id"]
        .as_str()
        .expect("location id")
        .to_string();

    let location = app
        .request("GET", &format!("/api/locations/{location_id}"), None, None)
        .await;
    assert_eq!(location.status, StatusCode::OK);
    assert_eq!(location.body["data"]["name"], "North Pier");

    let again = app
        .request(
            "POST",
            &format!("/api/admin/location-requests/{request_id}/approve"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(again.status, StatusCode::UNPROCESSABLE_ENTITY);

    let notifications = app
        .request("GET", "/api/notifications", None, Some(&provider))
        .await;
    assert_eq!(notifications.body["data"]["total"], 1);
    assert_eq!(
        notifications.body["data"]["items"][0]["kind"],
        "location_approved"
    );

    let marked = app
        .request("PUT", "/api/notifications/read-all", None, Some(&provider))
        .await;
    assert_eq!(marked.body["data"]["marked"], 1);
}

#[tokio::test]
async fn test_reject_requires_note_and_admin() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let admin = app.admin().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/providers/{provider_id}/location-requests"),
            Some(venue()),
            Some(&provider),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("id").to_string();
    let path = format!("/api/admin/location-requests/{request_id}/reject");

    let by_provider = app
        .request("POST", &path, Some(json!({ "note": "no" })), Some(&provider))
        .await;
    assert_eq!(by_provider.status, StatusCode::FORBIDDEN);

    let empty_note = app
        .request("POST", &path, Some(json!({ "note": "" })), Some(&admin))
        .await;
    assert_eq!(empty_note.status, StatusCode::BAD_REQUEST);

    let rejected = app
        .request(
            "POST",
            &path,
            Some(json!({ "note": "Address could not be verified" })),
            Some(&admin),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert_eq!(rejected.body["data"]["status"], "rejected");

    let mine = app
        .request(
            "GET",
            &format!("/api/providers/{provider_id}/location-requests"),
            None,
            Some(&provider),
        )
        .await;
    assert_eq!(mine.body["data"]["items"][0]["review_note"], "Address could not be verified");
}

#[tokio::test]
async fn test_out_of_range_coordinates_rejected() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;

    let mut body = venue();
    body["latitude"] = json!(123.0);
    let response = app
        .request(
            "POST",
            &format!("/api/providers/{provider_id}/location-requests"),
            Some(body),
            Some(&provider),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
