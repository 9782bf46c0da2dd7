//! Store bundle selected from configuration.

use std::sync::Arc;

use tracing::info;

use activityhub_core::config::{DatabaseConfig, DatabaseProvider};
#[cfg(not(feature = "memory"))]
use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::migration::run_migrations;
use crate::repositories::{
    ActivityRepository, BookingRepository, CustomerRepository, GiftCardRepository,
    LocationRepository, LocationRequestRepository, NotificationRepository, ProviderRepository,
    TimeSlotRepository, UserRepository, WishlistRepository,
};
use crate::traits::{
    ActivityStore, BookingStore, CustomerStore, GiftCardStore, LocationRequestStore,
    LocationStore, NotificationStore, ProviderStore, TimeSlotStore, UserStore, WishlistStore,
};

/// Every store the services need, for one backend.
#[derive(Debug, Clone)]
pub struct Stores {
    /// User accounts.
    pub users: Arc<dyn UserStore>,
    /// Customer profiles.
    pub customers: Arc<dyn CustomerStore>,
    /// Activity providers.
    pub providers: Arc<dyn ProviderStore>,
    /// Activities.
    pub activities: Arc<dyn ActivityStore>,
    /// Time slots.
    pub time_slots: Arc<dyn TimeSlotStore>,
    /// Bookings.
    pub bookings: Arc<dyn BookingStore>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationStore>,
    /// Location requests.
    pub location_requests: Arc<dyn LocationRequestStore>,
    /// Approved locations.
    pub locations: Arc<dyn LocationStore>,
    /// Wishlist entries.
    pub wishlist: Arc<dyn WishlistStore>,
    /// Gift cards.
    pub gift_cards: Arc<dyn GiftCardStore>,
    /// PostgreSQL pool, absent for the memory backend.
    pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured provider.
    ///
    /// For PostgreSQL this connects the pool and, when enabled, runs
    /// pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            #[cfg(feature = "memory")]
            DatabaseProvider::Memory => {
                info!("Initializing in-memory stores");
                Ok(Self::memory())
            }
            #[cfg(not(feature = "memory"))]
            DatabaseProvider::Memory => Err(AppError::configuration(
                "The memory database provider requires the 'memory' feature",
            )),
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        info!("Initializing PostgreSQL stores");
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            customers: Arc::new(CustomerRepository::new(pg.clone())),
            providers: Arc::new(ProviderRepository::new(pg.clone())),
            activities: Arc::new(ActivityRepository::new(pg.clone())),
            time_slots: Arc::new(TimeSlotRepository::new(pg.clone())),
            bookings: Arc::new(BookingRepository::new(pg.clone())),
            notifications: Arc::new(NotificationRepository::new(pg.clone())),
            location_requests: Arc::new(LocationRequestRepository::new(pg.clone())),
            locations: Arc::new(LocationRepository::new(pg.clone())),
            wishlist: Arc::new(WishlistRepository::new(pg.clone())),
            gift_cards: Arc::new(GiftCardRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-memory stores.
    #[cfg(feature = "memory")]
    pub fn memory() -> Self {
        use activityhub_entity::activity::Activity;
        use activityhub_entity::customer::Customer;
        use activityhub_entity::gift_card::GiftCard;
        use activityhub_entity::location::{Location, LocationRequest};
        use activityhub_entity::notification::Notification;
        use activityhub_entity::provider::ActivityProvider;
        use activityhub_entity::time_slot::TimeSlot;
        use activityhub_entity::user::User;
        use activityhub_entity::wishlist::WishlistItem;

        use crate::memory::{MemoryBookingStore, MemoryStore};

        let slots = MemoryStore::<TimeSlot>::new();
        Self {
            users: Arc::new(MemoryStore::<User>::new()),
            customers: Arc::new(MemoryStore::<Customer>::new()),
            providers: Arc::new(MemoryStore::<ActivityProvider>::new()),
            activities: Arc::new(MemoryStore::<Activity>::new()),
            bookings: Arc::new(MemoryBookingStore::new(slots.clone())),
            time_slots: Arc::new(slots),
            notifications: Arc::new(MemoryStore::<Notification>::new()),
            location_requests: Arc::new(MemoryStore::<LocationRequest>::new()),
            locations: Arc::new(MemoryStore::<Location>::new()),
            wishlist: Arc::new(MemoryStore::<WishlistItem>::new()),
            gift_cards: Arc::new(MemoryStore::<GiftCard>::new()),
            pool: None,
        }
    }

    /// The PostgreSQL pool, if this bundle is database-backed.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Name of the active backend.
    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}
