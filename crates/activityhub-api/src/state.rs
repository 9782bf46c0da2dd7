//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use activityhub_auth::JwtDecoder;
use activityhub_core::config::AppConfig;
use activityhub_database::Stores;
use activityhub_integrations::Integrations;
use activityhub_service::Services;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Store backend (PostgreSQL or memory).
    pub stores: Stores,
    /// Business services.
    pub services: Services,
    /// Access token validation for the `CurrentUser` extractor.
    pub jwt_decoder: Arc<JwtDecoder>,
}

impl AppState {
    /// Wire services over the given stores and collaborators.
    pub fn new(config: AppConfig, stores: Stores, integrations: &Integrations) -> Self {
        let services = Services::new(&stores, integrations, &config);
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        Self {
            config: Arc::new(config),
            stores,
            services,
            jwt_decoder,
        }
    }
}
