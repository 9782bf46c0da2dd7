//! Outbound collaborators treated as black boxes.
//!
//! The core only needs their call signatures: identifiers and amounts in,
//! a result or an error out. Implementations live in
//! `activityhub-integrations`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::AppResult;

/// A charge request sent to the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCharge {
    /// The paying customer.
    pub customer_id: Uuid,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Our reference for the charge (booking or gift card id).
    pub reference: String,
    /// Free-form description shown on the statement.
    pub description: String,
}

/// Takes and refunds payments.
#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Charge the customer. Returns the gateway's payment reference.
    async fn charge(&self, charge: &PaymentCharge) -> AppResult<String>;

    /// Refund a previous charge in full or in part.
    async fn refund(&self, payment_reference: &str, amount_cents: i64) -> AppResult<()>;
}

/// A transactional email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Sends transactional email.
#[async_trait]
pub trait EmailSender: Send + Sync + std::fmt::Debug + 'static {
    /// Send one message.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// External loyalty program.
#[async_trait]
pub trait LoyaltyService: Send + Sync + std::fmt::Debug + 'static {
    /// Award points to a customer for a completed booking.
    async fn award_points(&self, customer_id: Uuid, booking_id: Uuid, points: i64)
    -> AppResult<()>;
}

/// Product analytics sink.
#[async_trait]
pub trait AnalyticsService: Send + Sync + std::fmt::Debug + 'static {
    /// Record a named event with arbitrary properties.
    async fn track(
        &self,
        event: &str,
        user_id: Option<Uuid>,
        properties: serde_json::Value,
    ) -> AppResult<()>;
}

/// Outcome of an external gift card check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardValidation {
    /// Whether the card may be used.
    pub valid: bool,
    /// Reason for rejection, if any.
    #[serde(default)]
    pub reason: Option<String>,
}

impl GiftCardValidation {
    /// An accepting validation result.
    pub fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A rejecting validation result.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// External gift card fraud/validity check.
#[async_trait]
pub trait GiftCardValidator: Send + Sync + std::fmt::Debug + 'static {
    /// Validate a gift card code for use against the given amount.
    async fn validate(&self, code: &str, amount_cents: i64) -> AppResult<GiftCardValidation>;
}
