//! # activityhub-service
//!
//! Business logic service layer for ActivityHub. Every command and query
//! follows the same recipe: resolve the caller from the
//! [`RequestContext`], load the entities, check ownership, run the guarded
//! entity transition, and persist it.
//!
//! Services follow constructor injection. Stores and outbound collaborators
//! are provided at construction time as `Arc<dyn …>` references;
//! [`Services::new`] wires the whole set.

pub(crate) mod access;
pub mod activity;
pub mod auth;
pub mod booking;
pub mod context;
pub mod customer;
pub mod gift_card;
pub mod location;
pub mod notification;
pub mod provider;
pub mod time_slot;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use activityhub_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use activityhub_core::config::AppConfig;
use activityhub_database::Stores;
use activityhub_integrations::Integrations;

pub use activity::{ActivityService, NewActivity};
pub use auth::{AuthService, LoginResult, RegisterInput};
pub use booking::{BookingService, CreateBooking};
pub use context::RequestContext;
pub use customer::{CustomerService, UpdateCustomerProfile};
pub use gift_card::{GiftCardBalance, GiftCardService};
pub use location::LocationService;
pub use notification::NotificationService;
pub use provider::{NewProvider, ProviderService, UpdateProvider};
pub use time_slot::{NewTimeSlot, TimeSlotService};
pub use wishlist::WishlistService;

/// Every service, wired against one store backend.
#[derive(Debug, Clone)]
pub struct Services {
    /// Accounts and tokens.
    pub auth: Arc<AuthService>,
    /// Customer profiles.
    pub customers: Arc<CustomerService>,
    /// Providers.
    pub providers: Arc<ProviderService>,
    /// Activities.
    pub activities: Arc<ActivityService>,
    /// Time slots.
    pub time_slots: Arc<TimeSlotService>,
    /// Bookings.
    pub bookings: Arc<BookingService>,
    /// Notifications.
    pub notifications: Arc<NotificationService>,
    /// Location requests and locations.
    pub locations: Arc<LocationService>,
    /// Wishlists.
    pub wishlist: Arc<WishlistService>,
    /// Gift cards.
    pub gift_cards: Arc<GiftCardService>,
}

impl Services {
    /// Build every service.
    pub fn new(stores: &Stores, integrations: &Integrations, config: &AppConfig) -> Self {
        let notifications = Arc::new(NotificationService::new(Arc::clone(&stores.notifications)));

        let auth = AuthService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.customers),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config.auth)),
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::new(JwtDecoder::new(&config.auth)),
        );

        Self {
            auth: Arc::new(auth),
            customers: Arc::new(CustomerService::new(Arc::clone(&stores.customers))),
            providers: Arc::new(ProviderService::new(Arc::clone(&stores.providers))),
            activities: Arc::new(ActivityService::new(
                Arc::clone(&stores.activities),
                Arc::clone(&stores.providers),
            )),
            time_slots: Arc::new(TimeSlotService::new(
                Arc::clone(&stores.time_slots),
                Arc::clone(&stores.activities),
                Arc::clone(&stores.providers),
                Arc::clone(&stores.bookings),
            )),
            bookings: Arc::new(BookingService::new(
                stores,
                integrations,
                Arc::clone(&notifications),
                config.loyalty.clone(),
            )),
            locations: Arc::new(LocationService::new(
                Arc::clone(&stores.location_requests),
                Arc::clone(&stores.locations),
                Arc::clone(&stores.providers),
                Arc::clone(&notifications),
            )),
            wishlist: Arc::new(WishlistService::new(
                Arc::clone(&stores.wishlist),
                Arc::clone(&stores.customers),
                Arc::clone(&stores.activities),
            )),
            gift_cards: Arc::new(GiftCardService::new(
                Arc::clone(&stores.gift_cards),
                Arc::clone(&stores.customers),
                Arc::clone(&integrations.payments),
                Arc::clone(&integrations.email),
            )),
            notifications,
        }
    }
}
