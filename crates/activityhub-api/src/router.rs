//! Route definitions for the ActivityHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use activityhub_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{build_cors_layer, request_logging};
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let server = &config.server;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(customer_routes())
        .merge(provider_routes())
        .merge(activity_routes())
        .merge(booking_routes())
        .merge(notification_routes())
        .merge(location_routes())
        .merge(wishlist_routes())
        .merge(gift_card_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

async fn not_found() -> ApiError {
    AppError::not_found("Route not found").into()
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Auth endpoints: register, login, refresh, me
fn auth_routes() -> Router<AppState> {
    use handlers::auth;
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me))
}

fn customer_routes() -> Router<AppState> {
    use handlers::customer;
    Router::new().route(
        "/customers/me",
        get(customer::get_my_profile).put(customer::update_my_profile),
    )
}

/// Provider endpoints and the resources nested under a provider
fn provider_routes() -> Router<AppState> {
    use handlers::{activity, booking, location, provider};
    Router::new()
        .route(
            "/providers",
            get(provider::list_providers).post(provider::register_provider),
        )
        .route("/providers/mine", get(provider::list_my_providers))
        .route(
            "/providers/{id}",
            get(provider::get_provider).put(provider::update_provider),
        )
        .route("/providers/{id}/verify", post(provider::verify_provider))
        .route(
            "/providers/{id}/activities",
            get(activity::list_provider_activities).post(activity::create_activity),
        )
        .route(
            "/providers/{id}/bookings",
            get(booking::list_provider_bookings),
        )
        .route(
            "/providers/{id}/location-requests",
            get(location::list_provider_location_requests)
                .post(location::submit_location_request),
        )
}

fn activity_routes() -> Router<AppState> {
    use handlers::{activity, time_slot};
    Router::new()
        .route("/activities", get(activity::list_published))
        .route(
            "/activities/{id}",
            get(activity::get_activity)
                .put(activity::update_activity)
                .delete(activity::delete_activity),
        )
        .route("/activities/{id}/publish", post(activity::publish_activity))
        .route("/activities/{id}/archive", post(activity::archive_activity))
        .route(
            "/activities/{id}/time-slots",
            get(time_slot::list_time_slots).post(time_slot::add_time_slot),
        )
        .route("/time-slots/{id}/cancel", post(time_slot::cancel_time_slot))
}

fn booking_routes() -> Router<AppState> {
    use handlers::booking;
    Router::new()
        .route(
            "/bookings",
            get(booking::list_my_bookings).post(booking::create_booking),
        )
        .route("/bookings/{id}", get(booking::get_booking))
        .route("/bookings/{id}/confirm", post(booking::confirm_booking))
        .route("/bookings/{id}/cancel", post(booking::cancel_booking))
        .route("/bookings/{id}/check-in", post(booking::check_in_booking))
        .route("/bookings/{id}/complete", post(booking::complete_booking))
}

fn notification_routes() -> Router<AppState> {
    use handlers::notification;
    Router::new()
        .route("/notifications", get(notification::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notification::unread_count),
        )
        .route("/notifications/read-all", put(notification::mark_all_read))
        .route("/notifications/{id}/read", put(notification::mark_read))
        .route(
            "/notifications/{id}",
            delete(notification::delete_notification),
        )
}

fn location_routes() -> Router<AppState> {
    use handlers::location;
    Router::new()
        .route("/locations", get(location::list_locations))
        .route("/locations/{id}", get(location::get_location))
}

fn wishlist_routes() -> Router<AppState> {
    use handlers::wishlist;
    Router::new()
        .route("/wishlist", get(wishlist::list_wishlist))
        .route(
            "/wishlist/{activity_id}",
            post(wishlist::add_to_wishlist).delete(wishlist::remove_from_wishlist),
        )
}

fn gift_card_routes() -> Router<AppState> {
    use handlers::gift_card;
    Router::new()
        .route("/gift-cards", post(gift_card::purchase_gift_card))
        .route("/gift-cards/{code}/balance", get(gift_card::check_balance))
}

/// Admin endpoints: location moderation, complimentary gift cards
fn admin_routes() -> Router<AppState> {
    use handlers::{gift_card, location};
    Router::new()
        .route(
            "/admin/location-requests",
            get(location::list_pending_location_requests),
        )
        .route(
            "/admin/location-requests/{id}/approve",
            post(location::approve_location_request),
        )
        .route(
            "/admin/location-requests/{id}/reject",
            post(location::reject_location_request),
        )
        .route("/admin/gift-cards", post(gift_card::issue_gift_card))
}
