//! Analytics sink implementations.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::AnalyticsService;

use crate::client::IntegrationClient;

/// Ships events to a remote analytics API.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsService {
    client: IntegrationClient,
}

impl HttpAnalyticsService {
    /// Wrap a configured client.
    pub fn new(client: IntegrationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalyticsService for HttpAnalyticsService {
    async fn track(
        &self,
        event: &str,
        user_id: Option<Uuid>,
        properties: serde_json::Value,
    ) -> AppResult<()> {
        self.client
            .post(
                "events",
                &json!({ "event": event, "user_id": user_id, "properties": properties }),
            )
            .await
    }
}

/// Logs events at debug level.
#[derive(Debug, Clone, Default)]
pub struct LoggingAnalyticsService;

#[async_trait]
impl AnalyticsService for LoggingAnalyticsService {
    async fn track(
        &self,
        event: &str,
        user_id: Option<Uuid>,
        properties: serde_json::Value,
    ) -> AppResult<()> {
        debug!(event, user_id = ?user_id, %properties, "Analytics event");
        Ok(())
    }
}
