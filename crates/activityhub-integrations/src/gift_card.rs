//! Gift card validation implementations.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use activityhub_core::result::AppResult;
use activityhub_core::traits::{GiftCardValidation, GiftCardValidator};

use crate::client::IntegrationClient;

/// Asks a remote service whether a code may be used.
#[derive(Debug, Clone)]
pub struct HttpGiftCardValidator {
    client: IntegrationClient,
}

impl HttpGiftCardValidator {
    /// Wrap a configured client.
    pub fn new(client: IntegrationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GiftCardValidator for HttpGiftCardValidator {
    async fn validate(&self, code: &str, amount_cents: i64) -> AppResult<GiftCardValidation> {
        self.client
            .post_json(
                "validations",
                &json!({ "code": code, "amount_cents": amount_cents }),
            )
            .await
    }
}

/// Accepts every code; the local balance check still applies.
#[derive(Debug, Clone, Default)]
pub struct LoggingGiftCardValidator;

#[async_trait]
impl GiftCardValidator for LoggingGiftCardValidator {
    async fn validate(&self, code: &str, amount_cents: i64) -> AppResult<GiftCardValidation> {
        debug!(code, amount_cents, "Gift card accepted (logging validator)");
        Ok(GiftCardValidation::accepted())
    }
}
