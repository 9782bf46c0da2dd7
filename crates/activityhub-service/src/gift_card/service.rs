//! Gift card purchase, issuance, and balance lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::{EmailMessage, EmailSender, PaymentCharge, PaymentGateway, Repository};
use activityhub_database::traits::{CustomerStore, GiftCardStore};
use activityhub_entity::gift_card::GiftCard;

use super::code::generate_code;
use crate::access::customer_profile;
use crate::context::RequestContext;

/// Public view of a card's balance.
#[derive(Debug, Clone, Serialize)]
pub struct GiftCardBalance {
    /// Card code.
    pub code: String,
    /// Remaining balance in cents.
    pub balance_cents: i64,
    /// Currency.
    pub currency: String,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the card can be redeemed now.
    pub is_usable: bool,
}

impl From<&GiftCard> for GiftCardBalance {
    fn from(card: &GiftCard) -> Self {
        Self {
            code: card.code.clone(),
            balance_cents: card.balance_cents,
            currency: card.currency.clone(),
            expires_at: card.expires_at,
            is_usable: card.is_usable(),
        }
    }
}

/// Manages gift cards.
#[derive(Debug, Clone)]
pub struct GiftCardService {
    gift_cards: Arc<dyn GiftCardStore>,
    customers: Arc<dyn CustomerStore>,
    payments: Arc<dyn PaymentGateway>,
    email: Arc<dyn EmailSender>,
}

impl GiftCardService {
    /// Creates a new gift card service.
    pub fn new(
        gift_cards: Arc<dyn GiftCardStore>,
        customers: Arc<dyn CustomerStore>,
        payments: Arc<dyn PaymentGateway>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            gift_cards,
            customers,
            payments,
            email,
        }
    }

    /// Buy a gift card. The amount is charged before the card is stored.
    pub async fn purchase_gift_card(
        &self,
        ctx: &RequestContext,
        amount_cents: i64,
        currency: &str,
    ) -> AppResult<GiftCard> {
        let user_id = ctx.require_user()?;
        let customer = customer_profile(self.customers.as_ref(), user_id).await?;
        let card = GiftCard::issue(generate_code(), amount_cents, currency, Some(user_id), None)?;

        let reference = self
            .payments
            .charge(&PaymentCharge {
                customer_id: customer.id,
                amount_cents: card.initial_cents,
                currency: card.currency.clone(),
                reference: card.id.to_string(),
                description: "Gift card".to_string(),
            })
            .await
            .map_err(|e| AppError::external_service(format!("Payment failed: {}", e.message)))?;

        let card = self.gift_cards.create(&card).await?;
        info!(
            gift_card_id = %card.id,
            customer_id = %customer.id,
            amount_cents = card.initial_cents,
            payment_reference = %reference,
            "Gift card purchased"
        );

        if let Some(to) = ctx.email.clone() {
            let message = EmailMessage {
                to,
                subject: "Your gift card".to_string(),
                body: format!(
                    "Your gift card code is {} with a balance of {} {}.",
                    card.code,
                    card.balance_cents as f64 / 100.0,
                    card.currency
                ),
            };
            if let Err(e) = self.email.send(&message).await {
                warn!(gift_card_id = %card.id, error = %e, "Failed to email gift card");
            }
        }

        Ok(card)
    }

    /// Issue a complimentary card. Admin only.
    pub async fn issue_gift_card(
        &self,
        ctx: &RequestContext,
        amount_cents: i64,
        currency: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<GiftCard> {
        let admin_id = ctx.require_admin()?;
        if expires_at.is_some_and(|exp| exp <= Utc::now()) {
            return Err(AppError::validation("Expiry must be in the future"));
        }
        let card = GiftCard::issue(generate_code(), amount_cents, currency, None, expires_at)?;
        let card = self.gift_cards.create(&card).await?;

        info!(gift_card_id = %card.id, admin_id = %admin_id, amount_cents, "Gift card issued");
        Ok(card)
    }

    /// Look up a card's balance by code.
    pub async fn check_balance(
        &self,
        ctx: &RequestContext,
        code: &str,
    ) -> AppResult<GiftCardBalance> {
        ctx.require_user()?;
        let card = self
            .gift_cards
            .find_by_code(code.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Gift card not found"))?;
        Ok(GiftCardBalance::from(&card))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use activityhub_core::ErrorKind;
    use activityhub_integrations::Integrations;

    use super::*;
    use crate::testing::{FailingPayments, Fixture};

    #[tokio::test]
    async fn test_purchase_and_check_balance() {
        let fx = Fixture::new();
        let (customer, _) = fx.customer("c@example.com").await;

        let card = fx
            .services
            .gift_cards
            .purchase_gift_card(&customer, 5_000, "eur")
            .await
            .expect("purchase");
        assert_eq!(card.code.len(), 16);
        assert_eq!(card.currency, "EUR");

        let balance = fx
            .services
            .gift_cards
            .check_balance(&customer, &card.code.to_lowercase())
            .await
            .expect("balance");
        assert_eq!(balance.balance_cents, 5_000);
        assert!(balance.is_usable);
    }

    #[tokio::test]
    async fn test_failed_payment_stores_nothing() {
        let fx = Fixture::with_integrations(Integrations {
            payments: Arc::new(FailingPayments),
            ..Integrations::logging()
        });
        let (customer, _) = fx.customer("c@example.com").await;

        let err = fx
            .services
            .gift_cards
            .purchase_gift_card(&customer, 5_000, "EUR")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(fx.stores.gift_cards.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_issue_is_admin_only() {
        let fx = Fixture::new();
        let (customer, _) = fx.customer("c@example.com").await;
        let admin = fx.admin().await;

        let err = fx
            .services
            .gift_cards
            .issue_gift_card(&customer, 1_000, "EUR", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        fx.services
            .gift_cards
            .issue_gift_card(&admin, 1_000, "EUR", None)
            .await
            .expect("issue");
    }

    #[tokio::test]
    async fn test_balance_needs_user_and_known_code() {
        let fx = Fixture::new();
        let err = fx
            .services
            .gift_cards
            .check_balance(&RequestContext::anonymous("test"), "ABC")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        let (customer, _) = fx.customer("c@example.com").await;
        let err = fx
            .services
            .gift_cards
            .check_balance(&customer, "NOPE")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
