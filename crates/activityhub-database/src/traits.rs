//! Per-aggregate store traits.
//!
//! Each trait extends the generic [`Repository`] with the queries its
//! services need. Services hold `Arc<dyn …Store>` so the PostgreSQL and
//! in-memory backends are interchangeable.

use async_trait::async_trait;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::activity::Activity;
use activityhub_entity::booking::Booking;
use activityhub_entity::customer::Customer;
use activityhub_entity::gift_card::GiftCard;
use activityhub_entity::location::{Location, LocationRequest, LocationRequestStatus};
use activityhub_entity::notification::Notification;
use activityhub_entity::provider::ActivityProvider;
use activityhub_entity::time_slot::TimeSlot;
use activityhub_entity::user::User;
use activityhub_entity::wishlist::WishlistItem;

/// User accounts.
#[async_trait]
pub trait UserStore: Repository<User, Uuid> + std::fmt::Debug {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Customer profiles.
#[async_trait]
pub trait CustomerStore: Repository<Customer, Uuid> + std::fmt::Debug {
    /// Find the profile owned by a user.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Customer>>;
}

/// Activity providers.
#[async_trait]
pub trait ProviderStore: Repository<ActivityProvider, Uuid> + std::fmt::Debug {
    /// Providers owned by a user.
    async fn find_by_owner(&self, owner_user_id: Uuid) -> AppResult<Vec<ActivityProvider>>;
}

/// Activities.
#[async_trait]
pub trait ActivityStore: Repository<Activity, Uuid> + std::fmt::Debug {
    /// Published activities, newest first, optionally filtered by category.
    async fn find_published(
        &self,
        page: &PageRequest,
        category: Option<&str>,
    ) -> AppResult<PageResponse<Activity>>;

    /// All non-deleted activities of a provider.
    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Activity>>;
}

/// Time slots.
#[async_trait]
pub trait TimeSlotStore: Repository<TimeSlot, Uuid> + std::fmt::Debug {
    /// Slots of an activity ordered by start time.
    async fn find_by_activity(&self, activity_id: Uuid) -> AppResult<Vec<TimeSlot>>;

    /// Set the cancelled flag, provided the slot still holds exactly
    /// `booked_count` seats. Any reservation or release since the caller
    /// read the slot makes this fail with a conflict and leaves the row
    /// untouched.
    async fn mark_cancelled(&self, id: Uuid, booked_count: i32) -> AppResult<TimeSlot>;
}

/// Bookings.
///
/// Seat accounting lives here: creating a booking reserves seats in its
/// slot and cancelling one releases them, each atomically with the
/// booking write.
#[async_trait]
pub trait BookingStore: Repository<Booking, Uuid> + std::fmt::Debug {
    /// Reserve the booking's seats in its slot and insert it.
    ///
    /// Fails with a conflict when the slot lacks seats and with an invalid
    /// state when the slot is cancelled; nothing is written in that case.
    async fn create_reserving(&self, booking: &Booking) -> AppResult<Booking>;

    /// Persist a cancelled booking and release its seats.
    async fn cancel_releasing(&self, booking: &Booking) -> AppResult<Booking>;

    /// Bookings of a customer, newest first.
    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>>;

    /// Bookings across a provider's activities, newest first.
    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>>;

    /// Bookings in a slot that still hold seats.
    async fn count_active_for_slot(&self, time_slot_id: Uuid) -> AppResult<u64>;
}

/// In-app notifications.
#[async_trait]
pub trait NotificationStore: Repository<Notification, Uuid> + std::fmt::Debug {
    /// A user's notifications, newest first.
    async fn find_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Number of unread notifications for a user.
    async fn count_unread(&self, user_id: Uuid) -> AppResult<u64>;

    /// Mark every unread notification of a user as read. Returns the count.
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Location requests.
#[async_trait]
pub trait LocationRequestStore: Repository<LocationRequest, Uuid> + std::fmt::Debug {
    /// Requests in a status, oldest first.
    async fn find_by_status(
        &self,
        status: LocationRequestStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>>;

    /// Requests submitted for a provider, newest first.
    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>>;
}

/// Approved locations.
#[async_trait]
pub trait LocationStore: Repository<Location, Uuid> + std::fmt::Debug {}

/// Wishlist entries.
#[async_trait]
pub trait WishlistStore: Repository<WishlistItem, Uuid> + std::fmt::Debug {
    /// A customer's wishlist, newest first.
    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<WishlistItem>>;

    /// The entry for a `(customer, activity)` pair.
    async fn find_entry(
        &self,
        customer_id: Uuid,
        activity_id: Uuid,
    ) -> AppResult<Option<WishlistItem>>;
}

/// Gift cards.
#[async_trait]
pub trait GiftCardStore: Repository<GiftCard, Uuid> + std::fmt::Debug {
    /// Find a card by its code (case-insensitive).
    async fn find_by_code(&self, code: &str) -> AppResult<Option<GiftCard>>;

    /// Take up to `amount_cents` off a usable card's balance in one
    /// atomic step. Returns the amount applied.
    ///
    /// Concurrent redemptions of one card never apply more than its
    /// balance in total.
    async fn redeem(&self, code: &str, amount_cents: i64) -> AppResult<i64>;

    /// Add a previously redeemed amount back, capped at the initial value.
    async fn restore(&self, code: &str, amount_cents: i64) -> AppResult<()>;
}
