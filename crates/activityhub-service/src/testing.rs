//! Fixtures for service tests over the in-memory stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use activityhub_core::config::AppConfig;
use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::{LoyaltyService, PaymentCharge, PaymentGateway, Repository};
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_database::Stores;
use activityhub_database::traits::{BookingStore, GiftCardStore};
use activityhub_entity::activity::Activity;
use activityhub_entity::booking::Booking;
use activityhub_entity::customer::Customer;
use activityhub_entity::gift_card::GiftCard;
use activityhub_entity::provider::ActivityProvider;
use activityhub_entity::time_slot::TimeSlot;
use activityhub_entity::user::{User, UserRole};
use activityhub_integrations::Integrations;

use crate::activity::NewActivity;
use crate::booking::CreateBooking;
use crate::context::RequestContext;
use crate::time_slot::NewTimeSlot;
use crate::Services;

/// Loyalty program that is always down.
#[derive(Debug)]
pub(crate) struct FailingLoyalty;

#[async_trait]
impl LoyaltyService for FailingLoyalty {
    async fn award_points(&self, _: Uuid, _: Uuid, _: i64) -> AppResult<()> {
        Err(AppError::external_service("loyalty service unavailable"))
    }
}

/// Payment gateway that declines every charge.
#[derive(Debug)]
pub(crate) struct FailingPayments;

#[async_trait]
impl PaymentGateway for FailingPayments {
    async fn charge(&self, _: &PaymentCharge) -> AppResult<String> {
        Err(AppError::external_service("card declined"))
    }

    async fn refund(&self, _: &str, _: i64) -> AppResult<()> {
        Err(AppError::external_service("refunds disabled"))
    }
}

/// Payment gateway that approves charges and records refunds.
#[derive(Debug, Default)]
pub(crate) struct RecordingPayments {
    pub refunds: Mutex<Vec<(String, i64)>>,
}

#[async_trait]
impl PaymentGateway for RecordingPayments {
    async fn charge(&self, charge: &PaymentCharge) -> AppResult<String> {
        Ok(format!("rec-{}", charge.reference))
    }

    async fn refund(&self, payment_reference: &str, amount_cents: i64) -> AppResult<()> {
        if let Ok(mut refunds) = self.refunds.lock() {
            refunds.push((payment_reference.to_string(), amount_cents));
        }
        Ok(())
    }
}

/// Gift card table whose redemptions always fail.
#[derive(Debug)]
pub(crate) struct UnredeemableGiftCards {
    pub inner: Arc<dyn GiftCardStore>,
}

#[async_trait]
impl Repository<GiftCard, Uuid> for UnredeemableGiftCards {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<GiftCard>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<GiftCard>> {
        self.inner.find_all(page).await
    }

    async fn create(&self, entity: &GiftCard) -> AppResult<GiftCard> {
        self.inner.create(entity).await
    }

    async fn update(&self, _: &GiftCard) -> AppResult<GiftCard> {
        Err(AppError::internal("gift card table is read-only"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }
}

#[async_trait]
impl GiftCardStore for UnredeemableGiftCards {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<GiftCard>> {
        self.inner.find_by_code(code).await
    }

    async fn redeem(&self, _: &str, _: i64) -> AppResult<i64> {
        Err(AppError::internal("gift card table is read-only"))
    }

    async fn restore(&self, code: &str, amount_cents: i64) -> AppResult<()> {
        self.inner.restore(code, amount_cents).await
    }
}

/// Booking table that accepts reservations but rejects later updates.
#[derive(Debug)]
pub(crate) struct FrozenBookings {
    pub inner: Arc<dyn BookingStore>,
}

#[async_trait]
impl Repository<Booking, Uuid> for FrozenBookings {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Booking>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>> {
        self.inner.find_all(page).await
    }

    async fn create(&self, entity: &Booking) -> AppResult<Booking> {
        self.inner.create(entity).await
    }

    async fn update(&self, _: &Booking) -> AppResult<Booking> {
        Err(AppError::database("booking table is frozen"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }
}

#[async_trait]
impl BookingStore for FrozenBookings {
    async fn create_reserving(&self, booking: &Booking) -> AppResult<Booking> {
        self.inner.create_reserving(booking).await
    }

    async fn cancel_releasing(&self, booking: &Booking) -> AppResult<Booking> {
        self.inner.cancel_releasing(booking).await
    }

    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.inner.find_by_customer(customer_id, page).await
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.inner.find_by_provider(provider_id, page).await
    }

    async fn count_active_for_slot(&self, time_slot_id: Uuid) -> AppResult<u64> {
        self.inner.count_active_for_slot(time_slot_id).await
    }
}

pub(crate) fn new_activity() -> NewActivity {
    NewActivity {
        title: "Sunset kayak tour".into(),
        description: "Two hours along the coast".into(),
        category: "water".into(),
        price_cents: 4_500,
        currency: "EUR".into(),
        capacity: 8,
        location_id: None,
    }
}

pub(crate) struct Fixture {
    pub stores: Stores,
    pub services: Services,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_integrations(Integrations::logging())
    }

    pub fn with_integrations(integrations: Integrations) -> Self {
        Self::with_stores(Stores::memory(), integrations)
    }

    pub fn with_stores(stores: Stores, integrations: Integrations) -> Self {
        let services = Services::new(&stores, &integrations, &AppConfig::default());
        Self { stores, services }
    }

    async fn user(&self, email: &str, role: UserRole) -> User {
        self.stores
            .users
            .create(&User::new(email, "not-a-real-hash".into(), "Test User", role))
            .await
            .expect("seed user")
    }

    fn ctx(user: &User) -> RequestContext {
        RequestContext::authenticated(user.id, user.role, user.email.clone(), "127.0.0.1")
    }

    pub async fn customer(&self, email: &str) -> (RequestContext, Customer) {
        let user = self.user(email, UserRole::Customer).await;
        let customer = self
            .stores
            .customers
            .create(&Customer::new(user.id, "Test Customer"))
            .await
            .expect("seed customer");
        (Self::ctx(&user), customer)
    }

    pub async fn provider_user(&self, email: &str) -> RequestContext {
        Self::ctx(&self.user(email, UserRole::Provider).await)
    }

    pub async fn provider(&self, email: &str) -> (RequestContext, ActivityProvider) {
        let user = self.user(email, UserRole::Provider).await;
        let provider = self
            .stores
            .providers
            .create(&ActivityProvider::new(user.id, "Coastal Adventures", None, email))
            .await
            .expect("seed provider");
        (Self::ctx(&user), provider)
    }

    pub async fn admin(&self) -> RequestContext {
        Self::ctx(&self.user("admin@example.com", UserRole::Admin).await)
    }

    pub async fn draft_activity(&self, owner_email: &str) -> (RequestContext, Activity) {
        let (owner, provider) = self.provider(owner_email).await;
        let activity = self
            .services
            .activities
            .create_activity(&owner, provider.id, new_activity())
            .await
            .expect("create activity");
        (owner, activity)
    }

    pub async fn published_activity(&self, owner_email: &str) -> (RequestContext, Activity) {
        let (owner, draft) = self.draft_activity(owner_email).await;
        let activity = self
            .services
            .activities
            .publish_activity(&owner, draft.id)
            .await
            .expect("publish activity");
        (owner, activity)
    }

    pub async fn slot(&self, owner: &RequestContext, activity_id: Uuid, capacity: i32) -> TimeSlot {
        let start = Utc::now() + Duration::days(3);
        self.services
            .time_slots
            .add_time_slot(
                owner,
                activity_id,
                NewTimeSlot {
                    starts_at: start,
                    ends_at: start + Duration::hours(2),
                    capacity: Some(capacity),
                },
            )
            .await
            .expect("add slot")
    }

    pub async fn book(
        &self,
        customer: &RequestContext,
        activity_id: Uuid,
        time_slot_id: Uuid,
        participants: i32,
    ) -> Booking {
        self.services
            .bookings
            .create_booking(
                customer,
                CreateBooking {
                    activity_id,
                    time_slot_id,
                    participants,
                    gift_card_code: None,
                },
            )
            .await
            .expect("create booking")
    }
}
