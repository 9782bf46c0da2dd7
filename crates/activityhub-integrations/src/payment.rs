//! Payment gateway implementations.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::{PaymentCharge, PaymentGateway};

use crate::client::IntegrationClient;

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    reference: String,
}

/// Charges through a remote payment API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: IntegrationClient,
}

impl HttpPaymentGateway {
    /// Wrap a configured client.
    pub fn new(client: IntegrationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn charge(&self, charge: &PaymentCharge) -> AppResult<String> {
        let response: ChargeResponse = self.client.post_json("charges", charge).await?;
        Ok(response.reference)
    }

    async fn refund(&self, payment_reference: &str, amount_cents: i64) -> AppResult<()> {
        self.client
            .post(
                "refunds",
                &json!({ "reference": payment_reference, "amount_cents": amount_cents }),
            )
            .await
    }
}

/// Records charges in the log and returns a local reference.
#[derive(Debug, Clone, Default)]
pub struct LoggingPaymentGateway;

#[async_trait]
impl PaymentGateway for LoggingPaymentGateway {
    async fn charge(&self, charge: &PaymentCharge) -> AppResult<String> {
        let reference = format!("local-{}", Uuid::new_v4());
        info!(
            customer_id = %charge.customer_id,
            amount_cents = charge.amount_cents,
            currency = %charge.currency,
            reference = %charge.reference,
            payment_reference = %reference,
            "Payment charged (logging gateway)"
        );
        Ok(reference)
    }

    async fn refund(&self, payment_reference: &str, amount_cents: i64) -> AppResult<()> {
        info!(payment_reference, amount_cents, "Payment refunded (logging gateway)");
        Ok(())
    }
}
