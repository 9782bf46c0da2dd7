//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

use super::status::BookingStatus;

/// A customer's reservation of seats in a time slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: Uuid,
    /// Booking customer.
    pub customer_id: Uuid,
    /// Booked activity.
    pub activity_id: Uuid,
    /// Provider of the booked activity (denormalized for ownership checks).
    pub provider_id: Uuid,
    /// Booked time slot.
    pub time_slot_id: Uuid,
    /// Number of seats.
    pub participants: i32,
    /// Price before discounts, in cents.
    pub total_cents: i64,
    /// Amount covered by a gift card, in cents.
    pub discount_cents: i64,
    /// Amount charged to the customer, in cents.
    pub amount_due_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Redeemed gift card code.
    pub gift_card_code: Option<String>,
    /// Payment gateway reference for the charge.
    pub payment_reference: Option<String>,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// When the provider confirmed.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// When the customer checked in.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// When the booking was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Why the booking was cancelled.
    pub cancellation_reason: Option<String>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
    /// User that created the booking.
    pub created_by: Uuid,
}

/// Inputs for [`Booking::new`].
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Booking customer.
    pub customer_id: Uuid,
    /// Booked activity.
    pub activity_id: Uuid,
    /// Provider of the activity.
    pub provider_id: Uuid,
    /// Booked time slot.
    pub time_slot_id: Uuid,
    /// Number of seats.
    pub participants: i32,
    /// Price per participant in cents.
    pub unit_price_cents: i64,
    /// Currency code.
    pub currency: String,
    /// Acting user.
    pub created_by: Uuid,
}

impl Booking {
    /// Create a pending booking priced at `participants × unit price`.
    pub fn new(input: NewBooking) -> Result<Self, AppError> {
        if input.participants <= 0 {
            return Err(AppError::validation("At least one participant is required"));
        }
        let total_cents = input
            .unit_price_cents
            .checked_mul(i64::from(input.participants))
            .ok_or_else(|| AppError::validation("Booking total is too large"))?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            activity_id: input.activity_id,
            provider_id: input.provider_id,
            time_slot_id: input.time_slot_id,
            participants: input.participants,
            total_cents,
            discount_cents: 0,
            amount_due_cents: total_cents,
            currency: input.currency,
            gift_card_code: None,
            payment_reference: None,
            status: BookingStatus::Pending,
            confirmed_at: None,
            checked_in_at: None,
            completed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            created_by: input.created_by,
        })
    }

    /// Record a gift card discount against the total.
    pub fn apply_discount(&mut self, code: &str, discount_cents: i64) {
        let discount = discount_cents.clamp(0, self.total_cents);
        self.gift_card_code = Some(code.to_string());
        self.discount_cents = discount;
        self.amount_due_cents = self.total_cents - discount;
        self.updated_at = Utc::now();
    }

    /// Record the gateway reference for the charged amount.
    pub fn record_payment(&mut self, payment_reference: String) {
        self.payment_reference = Some(payment_reference);
        self.updated_at = Utc::now();
    }

    /// `pending → confirmed`.
    pub fn confirm(&mut self) -> Result<(), AppError> {
        self.expect_status(BookingStatus::Pending, "confirm")?;
        let now = Utc::now();
        self.status = BookingStatus::Confirmed;
        self.confirmed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// `confirmed → checked_in`.
    pub fn check_in(&mut self) -> Result<(), AppError> {
        self.expect_status(BookingStatus::Confirmed, "check in")?;
        let now = Utc::now();
        self.status = BookingStatus::CheckedIn;
        self.checked_in_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// `checked_in → completed`.
    pub fn complete(&mut self) -> Result<(), AppError> {
        self.expect_status(BookingStatus::CheckedIn, "complete")?;
        let now = Utc::now();
        self.status = BookingStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// `pending | confirmed → cancelled`.
    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), AppError> {
        if !self.status.is_cancellable() {
            return Err(AppError::invalid_state(format!(
                "Cannot cancel a booking that is {}",
                self.status
            )));
        }
        let now = Utc::now();
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(now);
        self.cancellation_reason = reason.filter(|r| !r.trim().is_empty());
        self.updated_at = now;
        Ok(())
    }

    fn expect_status(&self, expected: BookingStatus, action: &str) -> Result<(), AppError> {
        if self.status != expected {
            return Err(AppError::invalid_state(format!(
                "Cannot {action} a booking that is {} (expected {expected})",
                self.status
            )));
        }
        Ok(())
    }
}
