//! ActivityHub server: loads configuration, sets up logging, and serves the API.

use tracing_subscriber::{EnvFilter, fmt};

use activityhub_core::config::{AppConfig, LoggingConfig};
use activityhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    let warnings = match config.validate() {
        Ok(w) => w,
        Err(e) => {
            tracing::error!("{}", e.message);
            std::process::exit(1);
        }
    };
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    tracing::info!("Starting ActivityHub v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = activityhub_api::run_server(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("ACTIVITYHUB_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("ACTIVITYHUB_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
