//! Integration tests for registration, login, and the bearer extractor.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();
    let token = app.customer("ana@example.com").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(response.body["data"]["email"], "ana@example.com");
    assert_eq!(response.body["data"]["role"], "customer");
    assert!(response.body["data"].get("password_hash").is_none());

    let profile = app.request("GET", "/api/customers/me", None, Some(&token)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["data"]["loyalty_points"], 0);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.register("ana@example.com", "customer").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@example.com", "password": "wrong-password1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "NOT_AUTHENTICATED");
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_missing_token_is_anonymous() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "User is not authenticated");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();

    // Public endpoint, but a bad token is still refused.
    let path = format!("/api/activities/{}", uuid::Uuid::new_v4());
    let response = app.request("GET", &path, None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new();
    app.register("ana@example.com", "customer").await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@example.com", "password": "sunset42" })),
            None,
        )
        .await;
    let refresh_token = login.body["data"]["tokens"]["refresh_token"]
        .as_str()
        .expect("refresh token");

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["access_token"].is_string());

    // An access token is not accepted as a refresh token.
    let access_token = login.body["data"]["tokens"]["access_token"]
        .as_str()
        .expect("access token");
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": access_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejections() {
    let app = TestApp::new();
    app.register("ana@example.com", "customer").await;

    let duplicate = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "ana@example.com",
                "password": "sunset42",
                "full_name": "Ana Again",
            })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.error_code(), "CONFLICT");

    let admin = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "mallory@example.com",
                "password": "sunset42",
                "full_name": "Mallory",
                "role": "admin",
            })),
            None,
        )
        .await;
    assert_eq!(admin.status, StatusCode::BAD_REQUEST);

    let bad_email = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "not-an-email",
                "password": "sunset42",
                "full_name": "Nobody",
            })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_code(), "VALIDATION_ERROR");

    let malformed = app
        .request("POST", "/api/auth/register", Some(json!({ "email": 7 })), None)
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let app = TestApp::new();

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");
    assert_eq!(health.body["data"]["database"], "memory");

    let missing = app.request("GET", "/api/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_deactivated_account_loses_access() {
    use activityhub_core::traits::Repository;
    use activityhub_database::traits::UserStore;

    let app = TestApp::new();
    let token = app.customer("ana@example.com").await;

    let users = &app.state.stores.users;
    let mut user = users
        .find_by_email("ana@example.com")
        .await
        .expect("query")
        .expect("user");
    user.deactivate();
    users.update(&user).await.expect("deactivate");

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Account is no longer active");

    let response = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
