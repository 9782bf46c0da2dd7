//! # activityhub-integrations
//!
//! Implementations of the outbound collaborator traits declared in
//! `activityhub-core`. Each collaborator has two implementations:
//!
//! - **Http**: JSON POST to a configured endpoint through [`IntegrationClient`]
//! - **Logging**: records the call with `tracing` and succeeds
//!
//! [`Integrations::from_config`] picks one per collaborator: an endpoint
//! with a `base_url` gets the HTTP implementation.

pub mod analytics;
pub mod client;
pub mod email;
pub mod gift_card;
pub mod loyalty;
pub mod payment;

use std::sync::Arc;

use tracing::info;

use activityhub_core::config::IntegrationsConfig;
use activityhub_core::result::AppResult;
use activityhub_core::traits::{
    AnalyticsService, EmailSender, GiftCardValidator, LoyaltyService, PaymentGateway,
};

pub use analytics::{HttpAnalyticsService, LoggingAnalyticsService};
pub use client::IntegrationClient;
pub use email::{HttpEmailSender, LoggingEmailSender};
pub use gift_card::{HttpGiftCardValidator, LoggingGiftCardValidator};
pub use loyalty::{HttpLoyaltyService, LoggingLoyaltyService};
pub use payment::{HttpPaymentGateway, LoggingPaymentGateway};

/// The full set of outbound collaborators handed to the services.
#[derive(Debug, Clone)]
pub struct Integrations {
    /// Payment gateway.
    pub payments: Arc<dyn PaymentGateway>,
    /// Transactional email.
    pub email: Arc<dyn EmailSender>,
    /// Loyalty program.
    pub loyalty: Arc<dyn LoyaltyService>,
    /// Analytics sink.
    pub analytics: Arc<dyn AnalyticsService>,
    /// External gift card validation.
    pub gift_cards: Arc<dyn GiftCardValidator>,
}

impl Integrations {
    /// Build collaborators from configuration.
    pub fn from_config(config: &IntegrationsConfig) -> AppResult<Self> {
        let payments: Arc<dyn PaymentGateway> = if config.payment.is_remote() {
            Arc::new(HttpPaymentGateway::new(IntegrationClient::new(
                "payment",
                &config.payment,
            )?))
        } else {
            Arc::new(LoggingPaymentGateway)
        };

        let email: Arc<dyn EmailSender> = if config.email.is_remote() {
            Arc::new(HttpEmailSender::new(IntegrationClient::new(
                "email",
                &config.email,
            )?))
        } else {
            Arc::new(LoggingEmailSender)
        };

        let loyalty: Arc<dyn LoyaltyService> = if config.loyalty.is_remote() {
            Arc::new(HttpLoyaltyService::new(IntegrationClient::new(
                "loyalty",
                &config.loyalty,
            )?))
        } else {
            Arc::new(LoggingLoyaltyService)
        };

        let analytics: Arc<dyn AnalyticsService> = if config.analytics.is_remote() {
            Arc::new(HttpAnalyticsService::new(IntegrationClient::new(
                "analytics",
                &config.analytics,
            )?))
        } else {
            Arc::new(LoggingAnalyticsService)
        };

        let gift_cards: Arc<dyn GiftCardValidator> = if config.gift_card.is_remote() {
            Arc::new(HttpGiftCardValidator::new(IntegrationClient::new(
                "gift_card",
                &config.gift_card,
            )?))
        } else {
            Arc::new(LoggingGiftCardValidator)
        };

        info!(
            payment = config.payment.is_remote(),
            email = config.email.is_remote(),
            loyalty = config.loyalty.is_remote(),
            analytics = config.analytics.is_remote(),
            gift_card = config.gift_card.is_remote(),
            "Outbound integrations configured (true = remote)"
        );

        Ok(Self {
            payments,
            email,
            loyalty,
            analytics,
            gift_cards,
        })
    }

    /// Logging implementations for every collaborator.
    pub fn logging() -> Self {
        Self {
            payments: Arc::new(LoggingPaymentGateway),
            email: Arc::new(LoggingEmailSender),
            loyalty: Arc::new(LoggingLoyaltyService),
            analytics: Arc::new(LoggingAnalyticsService),
            gift_cards: Arc::new(LoggingGiftCardValidator),
        }
    }
}
