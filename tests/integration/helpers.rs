//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use activityhub_api::{AppState, build_app};
use activityhub_core::config::{AppConfig, DatabaseConfig, DatabaseProvider};
use activityhub_database::Stores;
use activityhub_integrations::Integrations;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct service calls
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application over fresh memory stores
    pub fn new() -> Self {
        let mut config = AppConfig {
            database: DatabaseConfig {
                provider: DatabaseProvider::Memory,
                ..Default::default()
            },
            ..Default::default()
        };
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let state = AppState::new(config, Stores::memory(), &Integrations::logging());
        let router = build_app(state.clone());

        Self { router, state }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Register an account with the given role
    pub async fn register(&self, email: &str, role: &str) {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "email": email,
                    "password": "sunset42",
                    "full_name": "Test User",
                    "role": role,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
    }

    /// Login and return the access token
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": "sunset42" })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["tokens"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Register and log in a customer
    pub async fn customer(&self, email: &str) -> String {
        self.register(email, "customer").await;
        self.login(email).await
    }

    /// Create an administrator and log in
    pub async fn admin(&self) -> String {
        self.state
            .services
            .auth
            .create_admin("admin@example.com", "sunset42", "Admin")
            .await
            .expect("Failed to create admin");
        self.login("admin@example.com").await
    }

    /// Register a provider account plus a provider; returns (token, provider id)
    pub async fn provider(&self, email: &str) -> (String, String) {
        self.register(email, "provider").await;
        let token = self.login(email).await;

        let response = self
            .request(
                "POST",
                "/api/providers",
                Some(json!({ "name": "Harbour Kayaks", "description": "Sea kayak tours" })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let id = response.body["data"]["id"]
            .as_str()
            .expect("provider id")
            .to_string();
        (token, id)
    }

    /// Create and publish an activity with one slot; returns (activity id, slot id)
    pub async fn bookable_activity(&self, token: &str, provider_id: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                &format!("/api/providers/{provider_id}/activities"),
                Some(json!({
                    "title": "Sunset paddle",
                    "description": "Two hours along the coast",
                    "category": "water",
                    "price_cents": 4500,
                    "currency": "EUR",
                    "capacity": 8,
                })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let activity_id = response.body["data"]["id"].as_str().expect("id").to_string();

        let response = self
            .request(
                "POST",
                &format!("/api/activities/{activity_id}/publish"),
                None,
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let starts_at = Utc::now() + Duration::days(3);
        let response = self
            .request(
                "POST",
                &format!("/api/activities/{activity_id}/time-slots"),
                Some(json!({
                    "starts_at": starts_at.to_rfc3339(),
                    "ends_at": (starts_at + Duration::hours(2)).to_rfc3339(),
                    "capacity": 4,
                })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let slot_id = response.body["data"]["id"].as_str().expect("id").to_string();

        (activity_id, slot_id)
    }

    /// Book seats and return the booking body
    pub async fn book(&self, token: &str, activity_id: &str, slot_id: &str, seats: i32) -> TestResponse {
        self.request(
            "POST",
            "/api/bookings",
            Some(json!({
                "activity_id": activity_id,
                "time_slot_id": slot_id,
                "participants": seats,
            })),
            Some(token),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of a failure envelope
    pub fn error_code(&self) -> &str {
        assert_eq!(self.body["success"], json!(false), "{:?}", self.body);
        self.body["error"].as_str().unwrap_or_default()
    }
}
