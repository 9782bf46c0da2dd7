//! [`MemoryRecord`] bindings and store trait implementations for every
//! aggregate except bookings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
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

use super::table::{MemoryRecord, MemoryStore};
use crate::traits::{
    ActivityStore, CustomerStore, GiftCardStore, LocationRequestStore, LocationStore,
    NotificationStore, ProviderStore, TimeSlotStore, UserStore, WishlistStore,
};

macro_rules! memory_record {
    ($ty:ty, $name:literal $(, deleted = $deleted:ident)? $(, unique = |$row:ident| $key:expr)?) => {
        impl MemoryRecord for $ty {
            const ENTITY: &'static str = $name;

            fn id(&self) -> Uuid {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            $(
                fn is_deleted(&self) -> bool {
                    self.$deleted
                }
            )?

            $(
                fn unique_key(&self) -> Option<String> {
                    let $row = self;
                    Some($key)
                }
            )?
        }
    };
}

memory_record!(User, "User", deleted = is_deleted, unique = |u| u.email.to_lowercase());
memory_record!(Customer, "Customer", deleted = is_deleted, unique = |c| c.user_id.to_string());
memory_record!(ActivityProvider, "Provider", deleted = is_deleted);
memory_record!(Activity, "Activity", deleted = is_deleted);
memory_record!(TimeSlot, "Time slot");
memory_record!(Booking, "Booking");
memory_record!(Notification, "Notification", deleted = is_deleted);
memory_record!(LocationRequest, "Location request");
memory_record!(Location, "Location");
memory_record!(
    WishlistItem,
    "Wishlist entry",
    unique = |w| format!("{}:{}", w.customer_id, w.activity_id)
);
memory_record!(GiftCard, "Gift card", unique = |g| g.code.to_uppercase());

#[async_trait]
impl UserStore for MemoryStore<User> {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .select(|u| u.email.to_lowercase() == email)
            .into_iter()
            .next())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore<Customer> {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self.select(|c| c.user_id == user_id).into_iter().next())
    }
}

#[async_trait]
impl ProviderStore for MemoryStore<ActivityProvider> {
    async fn find_by_owner(&self, owner_user_id: Uuid) -> AppResult<Vec<ActivityProvider>> {
        Ok(self.select(|p| p.owner_user_id == owner_user_id))
    }
}

#[async_trait]
impl ActivityStore for MemoryStore<Activity> {
    async fn find_published(
        &self,
        page: &PageRequest,
        category: Option<&str>,
    ) -> AppResult<PageResponse<Activity>> {
        let category = category.map(str::to_lowercase);
        Ok(self.page(page, |a| {
            a.is_bookable() && category.as_ref().is_none_or(|c| &a.category == c)
        }))
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Activity>> {
        Ok(self.page(page, |a| a.provider_id == provider_id))
    }
}

#[async_trait]
impl TimeSlotStore for MemoryStore<TimeSlot> {
    async fn find_by_activity(&self, activity_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        let mut slots = self.select(|s| s.activity_id == activity_id);
        slots.sort_by_key(|s| s.starts_at);
        Ok(slots)
    }

    async fn mark_cancelled(&self, id: Uuid, booked_count: i32) -> AppResult<TimeSlot> {
        self.with_row(id, |slot| {
            if !slot.is_cancelled && slot.booked_count != booked_count {
                return Err(AppError::conflict(
                    "Time slot bookings changed while cancelling; try again",
                ));
            }
            slot.cancel()?;
            Ok(slot.clone())
        })
    }
}

#[async_trait]
impl NotificationStore for MemoryStore<Notification> {
    async fn find_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        Ok(self.page(page, |n| n.user_id == user_id))
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self.select(|n| n.user_id == user_id && n.is_unread()).len() as u64)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self.update_where(
            |n| n.user_id == user_id && n.is_unread(),
            |n| {
                n.mark_read();
                true
            },
        ))
    }
}

#[async_trait]
impl LocationRequestStore for MemoryStore<LocationRequest> {
    async fn find_by_status(
        &self,
        status: LocationRequestStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>> {
        let mut rows = self.select(|r| r.status == status);
        rows.reverse();
        Ok(PageResponse::paginate(rows, page))
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>> {
        Ok(self.page(page, |r| r.provider_id == provider_id))
    }
}

#[async_trait]
impl LocationStore for MemoryStore<Location> {}

#[async_trait]
impl WishlistStore for MemoryStore<WishlistItem> {
    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<WishlistItem>> {
        Ok(self.page(page, |w| w.customer_id == customer_id))
    }

    async fn find_entry(
        &self,
        customer_id: Uuid,
        activity_id: Uuid,
    ) -> AppResult<Option<WishlistItem>> {
        Ok(self
            .select(|w| w.customer_id == customer_id && w.activity_id == activity_id)
            .into_iter()
            .next())
    }
}

#[async_trait]
impl GiftCardStore for MemoryStore<GiftCard> {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<GiftCard>> {
        let code = code.trim().to_uppercase();
        Ok(self.select(|g| g.code == code).into_iter().next())
    }

    async fn redeem(&self, code: &str, amount_cents: i64) -> AppResult<i64> {
        let card = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Gift card not found"))?;
        self.with_row(card.id, |card| card.redeem(amount_cents))
    }

    async fn restore(&self, code: &str, amount_cents: i64) -> AppResult<()> {
        let card = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Gift card not found"))?;
        self.with_row(card.id, |card| {
            card.restore(amount_cents);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;
    use activityhub_core::traits::Repository;

    use super::*;

    #[tokio::test]
    async fn test_wishlist_pair_is_unique() {
        let store = MemoryStore::<WishlistItem>::new();
        let (customer, activity) = (Uuid::new_v4(), Uuid::new_v4());
        store
            .create(&WishlistItem::new(customer, activity))
            .await
            .expect("first entry");
        let err = store
            .create(&WishlistItem::new(customer, activity))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(
            store
                .find_entry(customer, activity)
                .await
                .expect("lookup")
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        use activityhub_entity::user::UserRole;

        let store = MemoryStore::<User>::new();
        store
            .create(&User::new(
                "Ana@Example.com",
                "hash".into(),
                "Ana",
                UserRole::Customer,
            ))
            .await
            .expect("create");
        let found = store.find_by_email("ANA@example.COM").await.expect("find");
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_only_unread() {
        use activityhub_entity::notification::NotificationKind;

        let store = MemoryStore::<Notification>::new();
        let user = Uuid::new_v4();
        let mut read = Notification::new(user, NotificationKind::System, "a", "b");
        read.mark_read();
        store.create(&read).await.expect("create");
        store
            .create(&Notification::new(user, NotificationKind::System, "c", "d"))
            .await
            .expect("create");

        assert_eq!(store.count_unread(user).await.expect("count"), 1);
        assert_eq!(store.mark_all_read(user).await.expect("mark"), 1);
        assert_eq!(store.count_unread(user).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_redeem_never_overdraws_the_card() {
        let store = MemoryStore::<GiftCard>::new();
        store
            .create(&GiftCard::issue("SPLIT", 5_000, "EUR", None, None).expect("issue"))
            .await
            .expect("create");

        assert_eq!(store.redeem("split", 3_000).await.expect("first"), 3_000);
        assert_eq!(store.redeem("SPLIT", 3_000).await.expect("second"), 2_000);
        let err = store.redeem("SPLIT", 1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);

        store.restore("SPLIT", 2_000).await.expect("restore");
        let card = store.find_by_code("SPLIT").await.expect("find").expect("card");
        assert_eq!(card.balance_cents, 2_000);

        let err = store.redeem("NOPE", 100).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_mark_cancelled_keeps_concurrent_reservation() {
        use chrono::Duration;

        let store = MemoryStore::<TimeSlot>::new();
        let start = Utc::now() + Duration::days(1);
        let slot = TimeSlot::new(Uuid::new_v4(), start, start + Duration::hours(1), 4)
            .expect("slot");
        store.create(&slot).await.expect("create");

        // A reservation lands after the caller read the slot with no seats taken.
        store.with_row(slot.id, |s| s.reserve(2)).expect("reserve");

        let err = store.mark_cancelled(slot.id, 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        let stored = store.find_by_id(&slot.id).await.expect("find").expect("slot");
        assert_eq!(stored.booked_count, 2);
        assert!(!stored.is_cancelled);

        store
            .with_row(slot.id, |s| {
                s.release(2);
                Ok(())
            })
            .expect("release");
        let cancelled = store.mark_cancelled(slot.id, 0).await.expect("cancel");
        assert!(cancelled.is_cancelled);
        let err = store.mark_cancelled(slot.id, 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
    }
}
