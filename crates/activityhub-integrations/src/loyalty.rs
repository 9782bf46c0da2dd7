//! Loyalty program implementations.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::LoyaltyService;

use crate::client::IntegrationClient;

/// Awards points through a remote loyalty API.
#[derive(Debug, Clone)]
pub struct HttpLoyaltyService {
    client: IntegrationClient,
}

impl HttpLoyaltyService {
    /// Wrap a configured client.
    pub fn new(client: IntegrationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoyaltyService for HttpLoyaltyService {
    async fn award_points(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
        points: i64,
    ) -> AppResult<()> {
        self.client
            .post(
                "awards",
                &json!({
                    "customer_id": customer_id,
                    "booking_id": booking_id,
                    "points": points,
                }),
            )
            .await
    }
}

/// Logs point awards.
#[derive(Debug, Clone, Default)]
pub struct LoggingLoyaltyService;

#[async_trait]
impl LoyaltyService for LoggingLoyaltyService {
    async fn award_points(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
        points: i64,
    ) -> AppResult<()> {
        info!(%customer_id, %booking_id, points, "Loyalty points awarded (logging service)");
        Ok(())
    }
}
