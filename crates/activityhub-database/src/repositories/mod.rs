//! PostgreSQL store implementations for all ActivityHub aggregates.

pub mod activity;
pub mod booking;
pub mod customer;
pub mod gift_card;
pub mod location;
pub mod notification;
pub mod provider;
pub mod time_slot;
pub mod user;
pub mod wishlist;

pub use activity::ActivityRepository;
pub use booking::BookingRepository;
pub use customer::CustomerRepository;
pub use gift_card::GiftCardRepository;
pub use location::{LocationRepository, LocationRequestRepository};
pub use notification::NotificationRepository;
pub use provider::ProviderRepository;
pub use time_slot::TimeSlotRepository;
pub use user::UserRepository;
pub use wishlist::WishlistRepository;

use activityhub_core::error::{AppError, ErrorKind};

/// Map a sqlx error to an [`AppError`], turning unique violations into
/// conflicts.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: a record with the same unique value already exists"),
                e,
            )
        } else {
            AppError::with_source(ErrorKind::Database, context, e)
        }
    }
}
