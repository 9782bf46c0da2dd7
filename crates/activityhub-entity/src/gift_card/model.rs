//! Gift card entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

/// A prepaid balance redeemable against bookings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GiftCard {
    /// Unique gift card identifier.
    pub id: Uuid,
    /// Redemption code (unique, uppercase).
    pub code: String,
    /// Amount loaded at issue, in cents.
    pub initial_cents: i64,
    /// Remaining balance, in cents. Never negative.
    pub balance_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Buyer, when purchased by a customer.
    pub purchased_by: Option<Uuid>,
    /// Expiry time, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the card can still be used.
    pub is_active: bool,
    /// When the card was issued.
    pub created_at: DateTime<Utc>,
    /// When the card was last updated.
    pub updated_at: DateTime<Utc>,
}

impl GiftCard {
    /// Issue a new card with a full balance.
    pub fn issue(
        code: impl Into<String>,
        amount_cents: i64,
        currency: &str,
        purchased_by: Option<Uuid>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::validation("Gift card amount must be positive"));
        }
        let code = code.into().trim().to_uppercase();
        if code.is_empty() {
            return Err(AppError::validation("Gift card code is required"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            code,
            initial_cents: amount_cents,
            balance_cents: amount_cents,
            currency: currency.to_uppercase(),
            purchased_by,
            expires_at,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the card is active, unexpired, and has balance left.
    pub fn is_usable(&self) -> bool {
        self.is_active
            && self.balance_cents > 0
            && self.expires_at.is_none_or(|exp| exp > Utc::now())
    }

    /// Redeem up to `amount_cents`; returns the amount actually applied.
    pub fn redeem(&mut self, amount_cents: i64) -> Result<i64, AppError> {
        if !self.is_usable() {
            return Err(AppError::invalid_state(format!(
                "Gift card {} is not usable",
                self.code
            )));
        }
        if amount_cents <= 0 {
            return Ok(0);
        }
        let applied = amount_cents.min(self.balance_cents);
        self.balance_cents -= applied;
        self.updated_at = Utc::now();
        Ok(applied)
    }

    /// Return a previously redeemed amount. The balance never exceeds the
    /// initial value.
    pub fn restore(&mut self, amount_cents: i64) {
        if amount_cents <= 0 {
            return;
        }
        self.balance_cents = (self.balance_cents + amount_cents).min(self.initial_cents);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_redeem_caps_at_balance() {
        let mut card = GiftCard::issue("abcd", 5_000, "eur", None, None).expect("issue");
        assert_eq!(card.code, "ABCD");
        assert_eq!(card.redeem(3_000).expect("redeem"), 3_000);
        assert_eq!(card.redeem(3_000).expect("redeem"), 2_000);
        assert_eq!(card.balance_cents, 0);
        assert!(!card.is_usable());
        assert!(card.redeem(1).is_err());
    }

    #[test]
    fn test_expired_card_is_not_usable() {
        let card = GiftCard::issue(
            "OLD",
            1_000,
            "EUR",
            None,
            Some(Utc::now() - Duration::days(1)),
        )
        .expect("issue");
        assert!(!card.is_usable());
    }

    #[test]
    fn test_restore_caps_at_initial_value() {
        let mut card = GiftCard::issue("BACK", 2_000, "EUR", None, None).expect("issue");
        card.redeem(1_500).expect("redeem");
        card.restore(1_500);
        assert_eq!(card.balance_cents, 2_000);
        card.restore(700);
        assert_eq!(card.balance_cents, 2_000);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert!(GiftCard::issue("X", 0, "EUR", None, None).is_err());
    }
}
