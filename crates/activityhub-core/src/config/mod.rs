//! Application configuration schemas.
//!
//! Configuration is merged from TOML files and environment variables by
//! the `config` crate, then checked once at startup by
//! [`AppConfig::validate`], which fails fast on missing required settings
//! and returns warnings for optional ones.

pub mod app;
pub mod auth;
pub mod database;
pub mod integrations;
pub mod logging;
pub mod loyalty;
pub mod oauth;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::integrations::{EndpointConfig, IntegrationsConfig};
pub use self::logging::LoggingConfig;
pub use self::loyalty::LoyaltyConfig;
pub use self::oauth::{OAuthClientConfig, OAuthConfig};

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ACTIVITYHUB";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Optional social login settings.
    #[serde(default)]
    pub oauth: OAuthConfig,
    /// Outbound collaborator endpoints.
    #[serde(default)]
    pub integrations: IntegrationsConfig,
    /// Loyalty point award settings.
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config_path`, an environment-specific overlay
    /// `config/{env}.toml`, and environment variables prefixed with
    /// `ACTIVITYHUB__` (nested keys separated by `__`).
    pub fn load(config_path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Validate the configuration against the process environment.
    ///
    /// Returns the list of non-fatal warnings on success.
    pub fn validate(&self) -> Result<Vec<String>, AppError> {
        self.validate_with(|key| std::env::var(key).ok())
    }

    /// Validate the configuration using the given environment lookup.
    ///
    /// All problems are collected and reported together in a single
    /// multi-line configuration error.
    pub fn validate_with<F>(&self, lookup: F) -> Result<Vec<String>, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        if self.database.provider == DatabaseProvider::Postgres {
            if self.database.connection_string_with(&lookup).is_none() {
                errors.push(
                    "database connection is not configured: set DATABASE_URL, \
                     POSTGRES_HOST/POSTGRES_DB/POSTGRES_USER, or [database] url"
                        .to_string(),
                );
            }
            if self.database.max_connections == 0 {
                errors.push("database.max_connections must be greater than zero".to_string());
            }
            if self.database.min_connections > self.database.max_connections {
                errors.push(
                    "database.min_connections must not exceed database.max_connections"
                        .to_string(),
                );
            }
        }

        let secret = self.auth.jwt_secret.trim();
        if secret.is_empty() {
            errors.push("auth.jwt_secret is required".to_string());
        } else if secret == auth::PLACEHOLDER_JWT_SECRET && !self.server.is_development() {
            errors.push(format!(
                "auth.jwt_secret still has the placeholder value in the '{}' environment",
                self.server.environment
            ));
        }
        if self.auth.jwt_access_ttl_minutes == 0 {
            errors.push("auth.jwt_access_ttl_minutes must be greater than zero".to_string());
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            ));
        }

        if self.loyalty.enabled && self.loyalty.unit_cents <= 0 {
            errors.push("loyalty.unit_cents must be positive when loyalty is enabled".to_string());
        }

        if !errors.is_empty() {
            let details = errors
                .iter()
                .map(|e| format!("  - {e}"))
                .collect::<Vec<_>>()
                .join("\n");
            return Err(AppError::configuration(format!(
                "Configuration validation failed:\n{details}"
            )));
        }

        let mut warnings = self.oauth.warnings();
        if !self.integrations.payment.is_remote() {
            warnings.push(
                "integrations.payment.base_url is not set; payments are only logged".to_string(),
            );
        }
        Ok(warnings)
    }
}
