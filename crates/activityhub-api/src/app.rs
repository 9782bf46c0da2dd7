//! Application builder: wires stores, integrations, and services into an Axum app.

use axum::Router;

use activityhub_core::config::AppConfig;
use activityhub_core::error::AppError;
use activityhub_database::Stores;
use activityhub_integrations::Integrations;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the ActivityHub server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ActivityHub server...");

    let stores = Stores::connect(&config.database).await?;
    tracing::info!(backend = stores.backend(), "Store backend ready");

    let integrations = Integrations::from_config(&config.integrations)?;

    let addr = config.server.bind_address();
    let state = AppState::new(config, stores.clone(), &integrations);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ActivityHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(pool) = stores.pool() {
        pool.close().await;
    }
    tracing::info!("ActivityHub server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
