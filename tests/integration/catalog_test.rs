//! Integration tests for providers, activities, time slots, and wishlists.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_customers_cannot_register_providers() {
    let app = TestApp::new();
    let token = app.customer("ana@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/providers",
            Some(json!({ "name": "Not Mine" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "NOT_AUTHORIZED");
}

#[tokio::test]
async fn test_draft_activity_is_hidden_from_public() {
    let app = TestApp::new();
    let (token, provider_id) = app.provider("kayak@example.com").await;

    let created = app
        .request(
            "POST",
            &format!("/api/providers/{provider_id}/activities"),
            Some(json!({
                "title": "Night paddle",
                "category": "Water",
                "price_cents": 3000,
                "currency": "EUR",
                "capacity": 6,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["status"], "draft");
    let id = created.body["data"]["id"].as_str().expect("id").to_string();

    let public = app
        .request("GET", &format!("/api/activities/{id}"), None, None)
        .await;
    assert_eq!(public.status, StatusCode::NOT_FOUND);

    let owner = app
        .request("GET", &format!("/api/activities/{id}"), None, Some(&token))
        .await;
    assert_eq!(owner.status, StatusCode::OK);

    let listing = app.request("GET", "/api/activities", None, None).await;
    assert_eq!(listing.body["data"]["total"], 0);

    app.request(
        "POST",
        &format!("/api/activities/{id}/publish"),
        None,
        Some(&token),
    )
    .await;
    let listing = app
        .request("GET", "/api/activities?category=water&per_page=5", None, None)
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["data"]["total"], 1);
    assert_eq!(listing.body["data"]["per_page"], 5);
}

#[tokio::test]
async fn test_other_provider_cannot_edit_activity() {
    let app = TestApp::new();
    let (token, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, _) = app.bookable_activity(&token, &provider_id).await;
    let (rival, _) = app.provider("rival@example.com").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/activities/{activity_id}"),
            Some(json!({ "price_cents": 1 })),
            Some(&rival),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let archived = app
        .request(
            "POST",
            &format!("/api/activities/{activity_id}/archive"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.body["data"]["status"], "archived");

    let publish_again = app
        .request(
            "POST",
            &format!("/api/activities/{activity_id}/publish"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(publish_again.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(publish_again.error_code(), "INVALID_STATE");
}

#[tokio::test]
async fn test_invalid_path_id() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/activities/not-a-uuid", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_wishlist_add_list_remove() {
    let app = TestApp::new();
    let (provider, provider_id) = app.provider("kayak@example.com").await;
    let (activity_id, _) = app.bookable_activity(&provider, &provider_id).await;
    let token = app.customer("ana@example.com").await;

    let path = format!("/api/wishlist/{activity_id}");
    let added = app.request("POST", &path, None, Some(&token)).await;
    assert_eq!(added.status, StatusCode::CREATED);

    let again = app.request("POST", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let listed = app.request("GET", "/api/wishlist", None, Some(&token)).await;
    assert_eq!(listed.body["data"]["total"], 1);

    let removed = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(removed.status, StatusCode::OK);

    let removed_twice = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(removed_twice.status, StatusCode::NOT_FOUND);
}
