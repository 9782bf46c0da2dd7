//! Booking creation, provider-side transitions, and cancellation.
//!
//! Seat reservation and the booking insert happen atomically in the
//! store. Payment, gift card redemption, and notifications are layered
//! around that write:
//!
//! - any failure after the reservation (gift card, payment, final write)
//!   cancels the booking, releases its seats, and refunds what was taken
//! - notifications, emails, refunds, and analytics are best-effort
//! - loyalty awards after completion are logged and swallowed on failure

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use activityhub_core::config::LoyaltyConfig;
use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::{
    AnalyticsService, EmailMessage, EmailSender, GiftCardValidator, LoyaltyService,
    PaymentCharge, PaymentGateway, Repository,
};
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_database::Stores;
use activityhub_database::traits::{
    ActivityStore, BookingStore, CustomerStore, GiftCardStore, ProviderStore, TimeSlotStore,
    UserStore,
};
use activityhub_entity::booking::{Booking, NewBooking};
use activityhub_entity::customer::Customer;
use activityhub_entity::gift_card::GiftCard;
use activityhub_entity::notification::{Notification, NotificationKind};
use activityhub_entity::provider::ActivityProvider;
use activityhub_integrations::Integrations;

use crate::access::{customer_profile, load_activity, load_provider, managed_provider};
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// The activity to book.
    pub activity_id: Uuid,
    /// The slot within that activity.
    pub time_slot_id: Uuid,
    /// Number of seats.
    pub participants: i32,
    /// Optional gift card to apply.
    pub gift_card_code: Option<String>,
}

/// Manages bookings.
#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    time_slots: Arc<dyn TimeSlotStore>,
    activities: Arc<dyn ActivityStore>,
    providers: Arc<dyn ProviderStore>,
    customers: Arc<dyn CustomerStore>,
    users: Arc<dyn UserStore>,
    gift_cards: Arc<dyn GiftCardStore>,
    notifications: Arc<NotificationService>,
    payments: Arc<dyn PaymentGateway>,
    email: Arc<dyn EmailSender>,
    loyalty: Arc<dyn LoyaltyService>,
    analytics: Arc<dyn AnalyticsService>,
    gift_card_validator: Arc<dyn GiftCardValidator>,
    loyalty_config: LoyaltyConfig,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        stores: &Stores,
        integrations: &Integrations,
        notifications: Arc<NotificationService>,
        loyalty_config: LoyaltyConfig,
    ) -> Self {
        Self {
            bookings: Arc::clone(&stores.bookings),
            time_slots: Arc::clone(&stores.time_slots),
            activities: Arc::clone(&stores.activities),
            providers: Arc::clone(&stores.providers),
            customers: Arc::clone(&stores.customers),
            users: Arc::clone(&stores.users),
            gift_cards: Arc::clone(&stores.gift_cards),
            notifications,
            payments: Arc::clone(&integrations.payments),
            email: Arc::clone(&integrations.email),
            loyalty: Arc::clone(&integrations.loyalty),
            analytics: Arc::clone(&integrations.analytics),
            gift_card_validator: Arc::clone(&integrations.gift_cards),
            loyalty_config,
        }
    }

    /// Book seats in a time slot.
    pub async fn create_booking(
        &self,
        ctx: &RequestContext,
        input: CreateBooking,
    ) -> AppResult<Booking> {
        let user_id = ctx.require_user()?;
        let customer = customer_profile(self.customers.as_ref(), user_id).await?;

        let activity = load_activity(self.activities.as_ref(), input.activity_id).await?;
        if !activity.is_bookable() {
            return Err(AppError::invalid_state(format!(
                "Activity '{}' is not open for booking",
                activity.title
            )));
        }

        let slot = self
            .time_slots
            .find_by_id(&input.time_slot_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Time slot {} not found", input.time_slot_id))
            })?;
        if slot.activity_id != activity.id {
            return Err(AppError::validation("Time slot does not belong to this activity"));
        }
        if slot.is_cancelled {
            return Err(AppError::invalid_state("Time slot is cancelled"));
        }
        if slot.has_started() {
            return Err(AppError::invalid_state("Time slot has already started"));
        }

        let booking = Booking::new(NewBooking {
            customer_id: customer.id,
            activity_id: activity.id,
            provider_id: activity.provider_id,
            time_slot_id: slot.id,
            participants: input.participants,
            unit_price_cents: activity.price_cents,
            currency: activity.currency.clone(),
            created_by: user_id,
        })?;

        let gift_card_code = match input.gift_card_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                Some(self.checked_gift_card(code, &booking).await?.code)
            }
            _ => None,
        };

        let mut booking = self.bookings.create_reserving(&booking).await?;
        info!(
            booking_id = %booking.id,
            customer_id = %customer.id,
            time_slot_id = %slot.id,
            participants = booking.participants,
            "Seats reserved"
        );

        if let Some(code) = gift_card_code {
            match self.gift_cards.redeem(&code, booking.total_cents).await {
                Ok(applied) => booking.apply_discount(&code, applied),
                Err(e) => {
                    warn!(booking_id = %booking.id, gift_card = %code, error = %e, "Gift card redemption failed, releasing seats");
                    self.abandon(&mut booking, "Gift card redemption failed").await;
                    return Err(e);
                }
            }
        }

        if booking.amount_due_cents > 0 {
            let charge = PaymentCharge {
                customer_id: customer.id,
                amount_cents: booking.amount_due_cents,
                currency: booking.currency.clone(),
                reference: booking.id.to_string(),
                description: format!("{} x{}", activity.title, booking.participants),
            };
            match self.payments.charge(&charge).await {
                Ok(reference) => booking.record_payment(reference),
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "Payment failed, releasing seats");
                    self.abandon(&mut booking, "Payment failed").await;
                    return Err(AppError::external_service(format!(
                        "Payment failed: {}",
                        e.message
                    )));
                }
            }
        }

        let booking = match self.bookings.update(&booking).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(booking_id = %booking.id, error = %e, "Failed to save booking, rolling back");
                self.abandon(&mut booking, "Booking could not be saved").await;
                return Err(e);
            }
        };
        info!(
            booking_id = %booking.id,
            amount_due_cents = booking.amount_due_cents,
            discount_cents = booking.discount_cents,
            "Booking created"
        );

        if let Some(provider) = self.provider_best_effort(booking.provider_id).await {
            self.notifications
                .notify_best_effort(
                    Notification::new(
                        provider.owner_user_id,
                        NotificationKind::BookingCreated,
                        "New booking",
                        format!(
                            "{} seat(s) booked for '{}'",
                            booking.participants, activity.title
                        ),
                    )
                    .with_resource("booking", booking.id),
                )
                .await;
        }
        self.track(
            "booking_created",
            Some(user_id),
            json!({ "booking_id": booking.id, "activity_id": activity.id, "amount_cents": booking.amount_due_cents }),
        )
        .await;

        Ok(booking)
    }

    /// `pending → confirmed`. Provider owner only.
    pub async fn confirm_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<Booking> {
        let mut booking = self.provider_owned(ctx, booking_id).await?;
        booking.confirm()?;
        let booking = self.bookings.update(&booking).await?;
        info!(booking_id = %booking.id, "Booking confirmed");

        if let Some(customer) = self.customer_best_effort(booking.customer_id).await {
            self.notifications
                .notify_best_effort(
                    Notification::new(
                        customer.user_id,
                        NotificationKind::BookingConfirmed,
                        "Booking confirmed",
                        "Your booking has been confirmed by the provider",
                    )
                    .with_resource("booking", booking.id),
                )
                .await;
            self.email_user(
                customer.user_id,
                "Your booking is confirmed",
                format!(
                    "Hello {},\n\nYour booking {} for {} participant(s) is confirmed.",
                    customer.display_name, booking.id, booking.participants
                ),
            )
            .await;
        }

        Ok(booking)
    }

    /// Cancel a pending or confirmed booking.
    ///
    /// Either the booking customer or the provider owner may cancel. Seats
    /// are released with the write; refund, gift card restore, and the
    /// counter-party notification follow on a best-effort basis.
    pub async fn cancel_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let user_id = ctx.require_user()?;
        let mut booking = self.load(booking_id).await?;
        let customer = self.load_customer(booking.customer_id).await?;
        let provider = load_provider(self.providers.as_ref(), booking.provider_id).await?;

        let by_customer = customer.user_id == user_id;
        if !by_customer && !provider.is_owned_by(user_id) {
            return Err(AppError::authorization(
                "You are not allowed to cancel this booking",
            ));
        }

        booking.cancel(reason)?;
        let booking = self.bookings.cancel_releasing(&booking).await?;
        info!(booking_id = %booking.id, cancelled_by = %user_id, "Booking cancelled");

        self.refund_best_effort(&booking).await;
        self.restore_gift_card_best_effort(&booking).await;

        let recipient = if by_customer {
            provider.owner_user_id
        } else {
            customer.user_id
        };
        self.notifications
            .notify_best_effort(
                Notification::new(
                    recipient,
                    NotificationKind::BookingCancelled,
                    "Booking cancelled",
                    booking
                        .cancellation_reason
                        .clone()
                        .unwrap_or_else(|| "A booking was cancelled".to_string()),
                )
                .with_resource("booking", booking.id),
            )
            .await;

        Ok(booking)
    }

    /// `confirmed → checked_in`. Provider owner only.
    pub async fn check_in_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<Booking> {
        let mut booking = self.provider_owned(ctx, booking_id).await?;
        booking.check_in()?;
        let booking = self.bookings.update(&booking).await?;
        info!(booking_id = %booking.id, "Booking checked in");
        Ok(booking)
    }

    /// `checked_in → completed`, then award loyalty points.
    ///
    /// The completion is persisted first. A failing loyalty award is
    /// logged and never undoes it.
    pub async fn complete_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<Booking> {
        let mut booking = self.provider_owned(ctx, booking_id).await?;
        booking.complete()?;
        let booking = self.bookings.update(&booking).await?;
        info!(booking_id = %booking.id, "Booking completed");

        self.award_loyalty(&booking).await;
        self.track(
            "booking_completed",
            ctx.user_id,
            json!({ "booking_id": booking.id, "amount_cents": booking.amount_due_cents }),
        )
        .await;

        Ok(booking)
    }

    /// A booking visible to its customer, its provider owner, or an admin.
    pub async fn get_booking(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        let user_id = ctx.require_user()?;
        let booking = self.load(booking_id).await?;
        if ctx.is_admin() {
            return Ok(booking);
        }

        let customer = self.load_customer(booking.customer_id).await?;
        if customer.user_id == user_id {
            return Ok(booking);
        }
        let provider = load_provider(self.providers.as_ref(), booking.provider_id).await?;
        if provider.is_owned_by(user_id) {
            return Ok(booking);
        }
        Err(AppError::authorization("You cannot view this booking"))
    }

    /// The caller's bookings, newest first.
    pub async fn list_my_bookings(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let user_id = ctx.require_user()?;
        let customer = customer_profile(self.customers.as_ref(), user_id).await?;
        self.bookings.find_by_customer(customer.id, page).await
    }

    /// Bookings for a provider. Owner or admin.
    pub async fn list_provider_bookings(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let provider = managed_provider(self.providers.as_ref(), ctx, provider_id).await?;
        self.bookings.find_by_provider(provider.id, page).await
    }

    async fn load(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.bookings
            .find_by_id(&booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))
    }

    async fn load_customer(&self, customer_id: Uuid) -> AppResult<Customer> {
        self.customers
            .find_by_id(&customer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Customer {customer_id} not found")))
    }

    /// Load a booking whose provider the caller owns.
    async fn provider_owned(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        let user_id = ctx.require_user()?;
        let booking = self.load(booking_id).await?;
        let provider = load_provider(self.providers.as_ref(), booking.provider_id).await?;
        if !provider.is_owned_by(user_id) {
            return Err(AppError::authorization(
                "Only the activity provider can manage this booking",
            ));
        }
        Ok(booking)
    }

    /// Validate a gift card externally, then locally.
    async fn checked_gift_card(&self, code: &str, booking: &Booking) -> AppResult<GiftCard> {
        let validation = self
            .gift_card_validator
            .validate(code, booking.total_cents)
            .await?;
        if !validation.valid {
            return Err(AppError::validation(
                validation
                    .reason
                    .unwrap_or_else(|| "Gift card was rejected".to_string()),
            ));
        }

        let card = self
            .gift_cards
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Gift card not found"))?;
        if !card.is_usable() {
            return Err(AppError::invalid_state(format!(
                "Gift card {} is not usable",
                card.code
            )));
        }
        if !card.currency.eq_ignore_ascii_case(&booking.currency) {
            return Err(AppError::validation(format!(
                "Gift card currency {} does not match booking currency {}",
                card.currency, booking.currency
            )));
        }
        Ok(card)
    }

    /// Roll back a booking whose creation did not finish: cancel it,
    /// release its seats, refund any charge, and return any redeemed
    /// gift card amount.
    async fn abandon(&self, booking: &mut Booking, reason: &str) {
        if let Err(e) = booking.cancel(Some(reason.to_string())) {
            error!(booking_id = %booking.id, error = %e, "Failed to cancel unfinished booking");
            return;
        }
        if let Err(e) = self.bookings.cancel_releasing(booking).await {
            error!(booking_id = %booking.id, error = %e, "Failed to release seats of unfinished booking");
        }
        self.refund_best_effort(booking).await;
        self.restore_gift_card_best_effort(booking).await;
    }

    async fn refund_best_effort(&self, booking: &Booking) {
        let Some(reference) = booking.payment_reference.as_deref() else {
            return;
        };
        if booking.amount_due_cents <= 0 {
            return;
        }
        match self
            .payments
            .refund(reference, booking.amount_due_cents)
            .await
        {
            Ok(()) => info!(booking_id = %booking.id, amount_cents = booking.amount_due_cents, "Payment refunded"),
            Err(e) => warn!(booking_id = %booking.id, error = %e, "Refund failed"),
        }
    }

    async fn restore_gift_card_best_effort(&self, booking: &Booking) {
        let Some(code) = booking.gift_card_code.as_deref() else {
            return;
        };
        if booking.discount_cents <= 0 {
            return;
        }
        if let Err(e) = self.gift_cards.restore(code, booking.discount_cents).await {
            warn!(booking_id = %booking.id, gift_card = %code, error = %e, "Failed to restore gift card balance");
        }
    }

    async fn award_loyalty(&self, booking: &Booking) {
        let points = self.loyalty_config.points_for(booking.amount_due_cents);
        if points <= 0 {
            return;
        }
        if let Err(e) = self
            .loyalty
            .award_points(booking.customer_id, booking.id, points)
            .await
        {
            warn!(
                booking_id = %booking.id,
                customer_id = %booking.customer_id,
                points,
                error = %e,
                "Loyalty award failed; completion stands"
            );
            return;
        }

        let result: AppResult<()> = async {
            let mut customer = self.load_customer(booking.customer_id).await?;
            customer.add_loyalty_points(points);
            self.customers.update(&customer).await.map(|_| ())
        }
        .await;
        match result {
            Ok(()) => info!(booking_id = %booking.id, points, "Loyalty points awarded"),
            Err(e) => warn!(booking_id = %booking.id, error = %e, "Failed to record loyalty points"),
        }
    }

    async fn provider_best_effort(&self, provider_id: Uuid) -> Option<ActivityProvider> {
        match self.providers.find_by_id(&provider_id).await {
            Ok(provider) => provider,
            Err(e) => {
                warn!(provider_id = %provider_id, error = %e, "Failed to load provider");
                None
            }
        }
    }

    async fn customer_best_effort(&self, customer_id: Uuid) -> Option<Customer> {
        match self.customers.find_by_id(&customer_id).await {
            Ok(customer) => customer,
            Err(e) => {
                warn!(customer_id = %customer_id, error = %e, "Failed to load customer");
                None
            }
        }
    }

    async fn email_user(&self, user_id: Uuid, subject: &str, body: String) {
        let user = match self.users.find_by_id(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load email recipient");
                return;
            }
        };
        let message = EmailMessage {
            to: user.email,
            subject: subject.to_string(),
            body,
        };
        if let Err(e) = self.email.send(&message).await {
            warn!(user_id = %user_id, error = %e, "Failed to send email");
        }
    }

    async fn track(&self, event: &str, user_id: Option<Uuid>, properties: serde_json::Value) {
        if let Err(e) = self.analytics.track(event, user_id, properties).await {
            warn!(event, error = %e, "Failed to track analytics event");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use activityhub_core::ErrorKind;
    use activityhub_entity::booking::BookingStatus;
    use activityhub_entity::time_slot::TimeSlot;

    use super::*;
    use crate::testing::{
        FailingLoyalty, FailingPayments, Fixture, FrozenBookings, RecordingPayments,
        UnredeemableGiftCards,
    };

    fn request(activity_id: Uuid, time_slot_id: Uuid, participants: i32) -> CreateBooking {
        CreateBooking {
            activity_id,
            time_slot_id,
            participants,
            gift_card_code: None,
        }
    }

    async fn slot_row(fx: &Fixture, id: Uuid) -> TimeSlot {
        fx.stores
            .time_slots
            .find_by_id(&id)
            .await
            .expect("query")
            .expect("slot")
    }

    #[tokio::test]
    async fn test_anonymous_cannot_book() {
        let fx = Fixture::new();
        let err = fx
            .services
            .bookings
            .create_booking(
                &RequestContext::anonymous("test"),
                request(Uuid::new_v4(), Uuid::new_v4(), 1),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "User is not authenticated");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let fx = Fixture::new();
        let (customer, _) = fx.customer("c@example.com").await;
        let (_, activity) = fx.published_activity("owner@example.com").await;

        let err = fx
            .services
            .bookings
            .create_booking(&customer, request(activity.id, Uuid::new_v4(), 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = fx
            .services
            .bookings
            .confirm_booking(&customer, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_booking_reserves_seats_and_charges() {
        let fx = Fixture::new();
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, _) = fx.customer("c@example.com").await;

        let booking = fx
            .services
            .bookings
            .create_booking(&customer, request(activity.id, slot.id, 3))
            .await
            .expect("book");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_cents, activity.price_cents * 3);
        assert!(booking
            .payment_reference
            .as_deref()
            .is_some_and(|r| r.starts_with("local-")));
        assert_eq!(slot_row(&fx, slot.id).await.booked_count, 3);

        let err = fx
            .services
            .bookings
            .create_booking(&customer, request(activity.id, slot.id, 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let inbox = fx
            .services
            .notifications
            .unread_count(&owner)
            .await
            .expect("count");
        assert_eq!(inbox, 1);
    }

    #[tokio::test]
    async fn test_draft_and_mismatched_slot_are_rejected() {
        let fx = Fixture::new();
        let (owner, draft) = fx.draft_activity("owner@example.com").await;
        let (customer, _) = fx.customer("c@example.com").await;
        let (other_owner, other) = fx.published_activity("other@example.com").await;
        let other_slot = fx.slot(&other_owner, other.id, 4).await;

        let err = fx
            .services
            .bookings
            .create_booking(&customer, request(draft.id, other_slot.id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);

        fx.services
            .activities
            .publish_activity(&owner, draft.id)
            .await
            .expect("publish");
        let err = fx
            .services
            .bookings
            .create_booking(&customer, request(draft.id, other_slot.id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_payment_failure_releases_seats() {
        let fx = Fixture::with_integrations(Integrations {
            payments: Arc::new(FailingPayments),
            ..Integrations::logging()
        });
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, profile) = fx.customer("c@example.com").await;

        let err = fx
            .services
            .bookings
            .create_booking(&customer, request(activity.id, slot.id, 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(slot_row(&fx, slot.id).await.booked_count, 0);

        let page = fx
            .stores
            .bookings
            .find_by_customer(profile.id, &PageRequest::default())
            .await
            .expect("list");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_gift_card_covers_the_total() {
        let fx = Fixture::with_integrations(Integrations {
            payments: Arc::new(FailingPayments),
            ..Integrations::logging()
        });
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, _) = fx.customer("c@example.com").await;
        let card = GiftCard::issue("GIFT-0001", 100_000, &activity.currency, None, None)
            .expect("issue");
        fx.stores.gift_cards.create(&card).await.expect("seed card");

        let booking = fx
            .services
            .bookings
            .create_booking(
                &customer,
                CreateBooking {
                    gift_card_code: Some("gift-0001".into()),
                    ..request(activity.id, slot.id, 2)
                },
            )
            .await
            .expect("book without charging");
        assert_eq!(booking.amount_due_cents, 0);
        assert_eq!(booking.discount_cents, booking.total_cents);
        assert!(booking.payment_reference.is_none());

        let stored = fx
            .stores
            .gift_cards
            .find_by_code("GIFT-0001")
            .await
            .expect("query")
            .expect("card");
        assert_eq!(stored.balance_cents, 100_000 - booking.total_cents);

        fx.services
            .bookings
            .cancel_booking(&customer, booking.id, None)
            .await
            .expect("cancel");
        let restored = fx
            .stores
            .gift_cards
            .find_by_code("GIFT-0001")
            .await
            .expect("query")
            .expect("card");
        assert_eq!(restored.balance_cents, 100_000);
    }

    #[tokio::test]
    async fn test_only_provider_owner_manages_bookings() {
        let fx = Fixture::new();
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, _) = fx.customer("c@example.com").await;
        let (stranger, _) = fx.customer("stranger@example.com").await;
        let (other_provider, _) = fx.provider("rival@example.com").await;
        let booking = fx.book(&customer, activity.id, slot.id, 1).await;

        for ctx in [&customer, &other_provider] {
            let err = fx
                .services
                .bookings
                .confirm_booking(ctx, booking.id)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authorization);
        }

        let err = fx
            .services
            .bookings
            .get_booking(&stranger, booking.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = fx
            .services
            .bookings
            .cancel_booking(&stranger, booking.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = fx
            .services
            .bookings
            .list_provider_bookings(&other_provider, activity.provider_id, &PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_full_lifecycle_persists() {
        let fx = Fixture::new();
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, profile) = fx.customer("c@example.com").await;
        let booking = fx.book(&customer, activity.id, slot.id, 2).await;
        let bookings = &fx.services.bookings;

        let err = bookings
            .complete_booking(&owner, booking.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);

        bookings
            .confirm_booking(&owner, booking.id)
            .await
            .expect("confirm");
        bookings
            .check_in_booking(&owner, booking.id)
            .await
            .expect("check in");
        let done = bookings
            .complete_booking(&owner, booking.id)
            .await
            .expect("complete");
        assert_eq!(done.status, BookingStatus::Completed);

        let stored = bookings.get_booking(&customer, booking.id).await.expect("get");
        assert_eq!(stored.status, BookingStatus::Completed);
        assert!(stored.confirmed_at.is_some() && stored.checked_in_at.is_some());

        let profile = fx
            .stores
            .customers
            .find_by_id(&profile.id)
            .await
            .expect("query")
            .expect("customer");
        assert_eq!(
            profile.loyalty_points,
            LoyaltyConfig::default().points_for(done.amount_due_cents)
        );

        let err = bookings
            .cancel_booking(&customer, booking.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_loyalty_failure_keeps_completion() {
        let fx = Fixture::with_integrations(Integrations {
            loyalty: Arc::new(FailingLoyalty),
            ..Integrations::logging()
        });
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, profile) = fx.customer("c@example.com").await;
        let booking = fx.book(&customer, activity.id, slot.id, 1).await;
        let bookings = &fx.services.bookings;

        bookings.confirm_booking(&owner, booking.id).await.expect("confirm");
        bookings.check_in_booking(&owner, booking.id).await.expect("check in");
        let done = bookings
            .complete_booking(&owner, booking.id)
            .await
            .expect("completion succeeds despite loyalty failure");
        assert_eq!(done.status, BookingStatus::Completed);

        let stored = fx
            .stores
            .bookings
            .find_by_id(&booking.id)
            .await
            .expect("query")
            .expect("booking");
        assert_eq!(stored.status, BookingStatus::Completed);

        let profile = fx
            .stores
            .customers
            .find_by_id(&profile.id)
            .await
            .expect("query")
            .expect("customer");
        assert_eq!(profile.loyalty_points, 0);
    }

    #[tokio::test]
    async fn test_provider_cancel_releases_seats_and_notifies_customer() {
        let fx = Fixture::new();
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, _) = fx.customer("c@example.com").await;
        let booking = fx.book(&customer, activity.id, slot.id, 3).await;

        let cancelled = fx
            .services
            .bookings
            .cancel_booking(&owner, booking.id, Some("Weather".into()))
            .await
            .expect("cancel");
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Weather"));
        assert_eq!(slot_row(&fx, slot.id).await.booked_count, 0);

        let unread = fx
            .services
            .notifications
            .unread_count(&customer)
            .await
            .expect("count");
        assert_eq!(unread, 1);
    }

    #[tokio::test]
    async fn test_started_slot_cannot_be_booked() {
        let fx = Fixture::new();
        let (_, activity) = fx.published_activity("owner@example.com").await;
        let (customer, _) = fx.customer("c@example.com").await;
        let start = Utc::now() - Duration::minutes(30);
        let slot = TimeSlot::new(activity.id, start, start + Duration::hours(2), 5)
            .expect("slot");
        fx.stores.time_slots.create(&slot).await.expect("seed slot");

        let err = fx
            .services
            .bookings
            .create_booking(&customer, request(activity.id, slot.id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
    }

    async fn seed_card(fx: &Fixture, code: &str, amount_cents: i64, currency: &str) {
        let card = GiftCard::issue(code, amount_cents, currency, None, None).expect("issue");
        fx.stores.gift_cards.create(&card).await.expect("seed card");
    }

    async fn card_balance(fx: &Fixture, code: &str) -> i64 {
        fx.stores
            .gift_cards
            .find_by_code(code)
            .await
            .expect("query")
            .expect("card")
            .balance_cents
    }

    #[tokio::test]
    async fn test_failed_redemption_leaves_no_booking_behind() {
        let mut stores = Stores::memory();
        stores.gift_cards = Arc::new(UnredeemableGiftCards {
            inner: Arc::clone(&stores.gift_cards),
        });
        let fx = Fixture::with_stores(stores, Integrations::logging());
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, profile) = fx.customer("c@example.com").await;
        seed_card(&fx, "G1", 100_000, &activity.currency).await;

        let err = fx
            .services
            .bookings
            .create_booking(
                &customer,
                CreateBooking {
                    gift_card_code: Some("G1".into()),
                    ..request(activity.id, slot.id, 2)
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(slot_row(&fx, slot.id).await.booked_count, 0);
        assert_eq!(card_balance(&fx, "G1").await, 100_000);

        let page = fx
            .stores
            .bookings
            .find_by_customer(profile.id, &PageRequest::default())
            .await
            .expect("list");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].status, BookingStatus::Cancelled);
        assert_eq!(page.items[0].discount_cents, 0);
    }

    #[tokio::test]
    async fn test_failed_final_write_refunds_and_restores() {
        let payments = Arc::new(RecordingPayments::default());
        let mut stores = Stores::memory();
        stores.bookings = Arc::new(FrozenBookings {
            inner: Arc::clone(&stores.bookings),
        });
        let fx = Fixture::with_stores(
            stores,
            Integrations {
                payments: Arc::clone(&payments) as Arc<dyn PaymentGateway>,
                ..Integrations::logging()
            },
        );
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 4).await;
        let (customer, profile) = fx.customer("c@example.com").await;
        seed_card(&fx, "HALF", 4_500, &activity.currency).await;

        let err = fx
            .services
            .bookings
            .create_booking(
                &customer,
                CreateBooking {
                    gift_card_code: Some("HALF".into()),
                    ..request(activity.id, slot.id, 2)
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(slot_row(&fx, slot.id).await.booked_count, 0);
        assert_eq!(card_balance(&fx, "HALF").await, 4_500);

        let page = fx
            .stores
            .bookings
            .find_by_customer(profile.id, &PageRequest::default())
            .await
            .expect("list");
        let stored = &page.items[0];
        assert_eq!(stored.status, BookingStatus::Cancelled);
        let reference = stored.payment_reference.clone().expect("charged");

        let refunds = payments.refunds.lock().expect("refunds").clone();
        assert_eq!(refunds, vec![(reference, activity.price_cents * 2 - 4_500)]);
    }

    #[tokio::test]
    async fn test_gift_card_is_not_spent_twice() {
        let fx = Fixture::new();
        let (owner, activity) = fx.published_activity("owner@example.com").await;
        let slot = fx.slot(&owner, activity.id, 8).await;
        let (first, _) = fx.customer("first@example.com").await;
        let (second, _) = fx.customer("second@example.com").await;
        let total = activity.price_cents * 2;
        seed_card(&fx, "SHARED", total + total / 2, &activity.currency).await;

        let with_card = || CreateBooking {
            gift_card_code: Some("SHARED".into()),
            ..request(activity.id, slot.id, 2)
        };
        let bookings = &fx.services.bookings;
        let (a, b) = tokio::join!(
            bookings.create_booking(&first, with_card()),
            bookings.create_booking(&second, with_card()),
        );
        let (a, b) = (a.expect("first booking"), b.expect("second booking"));

        assert_eq!(a.discount_cents + b.discount_cents, total + total / 2);
        assert_eq!(a.amount_due_cents + b.amount_due_cents, total / 2);
        assert_eq!(card_balance(&fx, "SHARED").await, 0);
    }
}
