//! In-memory booking store with seat accounting.

use async_trait::async_trait;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::booking::{Booking, BookingStatus};
use activityhub_entity::time_slot::TimeSlot;

use super::table::MemoryStore;
use crate::traits::BookingStore;

/// Booking table that shares the time slot table for reservations.
#[derive(Debug, Clone)]
pub struct MemoryBookingStore {
    bookings: MemoryStore<Booking>,
    slots: MemoryStore<TimeSlot>,
}

impl MemoryBookingStore {
    /// Create a booking table reserving seats in `slots`.
    pub fn new(slots: MemoryStore<TimeSlot>) -> Self {
        Self {
            bookings: MemoryStore::new(),
            slots,
        }
    }
}

#[async_trait]
impl Repository<Booking, Uuid> for MemoryBookingStore {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Booking>> {
        self.bookings.find_by_id(id).await
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>> {
        self.bookings.find_all(page).await
    }

    async fn create(&self, entity: &Booking) -> AppResult<Booking> {
        self.bookings.create(entity).await
    }

    async fn update(&self, entity: &Booking) -> AppResult<Booking> {
        self.bookings.update(entity).await
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        self.bookings.delete(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.bookings.count().await
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create_reserving(&self, booking: &Booking) -> AppResult<Booking> {
        self.slots
            .with_row(booking.time_slot_id, |slot| slot.reserve(booking.participants))?;

        match self.bookings.create(booking).await {
            Ok(created) => Ok(created),
            Err(e) => {
                self.slots.with_row(booking.time_slot_id, |slot| {
                    slot.release(booking.participants);
                    Ok(())
                })?;
                Err(e)
            }
        }
    }

    async fn cancel_releasing(&self, booking: &Booking) -> AppResult<Booking> {
        if booking.status != BookingStatus::Cancelled {
            return Err(AppError::invalid_state(format!(
                "Booking {} is {}, not cancelled",
                booking.id, booking.status
            )));
        }
        let stored = self.bookings.update(booking).await?;
        self.slots.with_row(booking.time_slot_id, |slot| {
            slot.release(booking.participants);
            Ok(())
        })?;
        Ok(stored)
    }

    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        Ok(self.bookings.page(page, |b| b.customer_id == customer_id))
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        Ok(self.bookings.page(page, |b| b.provider_id == provider_id))
    }

    async fn count_active_for_slot(&self, time_slot_id: Uuid) -> AppResult<u64> {
        Ok(self
            .bookings
            .select(|b| b.time_slot_id == time_slot_id && b.status.holds_seats())
            .len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;
    use activityhub_entity::booking::NewBooking;
    use chrono::{Duration, Utc};

    use super::*;

    async fn slot_with(capacity: i32) -> (MemoryStore<TimeSlot>, TimeSlot) {
        let slots = MemoryStore::new();
        let start = Utc::now() + Duration::days(2);
        let slot = TimeSlot::new(Uuid::new_v4(), start, start + Duration::hours(1), capacity)
            .expect("slot");
        slots.create(&slot).await.expect("insert slot");
        (slots, slot)
    }

    fn booking_for(slot: &TimeSlot, participants: i32) -> Booking {
        Booking::new(NewBooking {
            customer_id: Uuid::new_v4(),
            activity_id: slot.activity_id,
            provider_id: Uuid::new_v4(),
            time_slot_id: slot.id,
            participants,
            unit_price_cents: 1_500,
            currency: "EUR".into(),
            created_by: Uuid::new_v4(),
        })
        .expect("booking")
    }

    #[tokio::test]
    async fn test_reservation_is_bounded_by_capacity() {
        let (slots, slot) = slot_with(3).await;
        let store = MemoryBookingStore::new(slots.clone());

        store
            .create_reserving(&booking_for(&slot, 2))
            .await
            .expect("fits");
        let err = store
            .create_reserving(&booking_for(&slot, 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let stored = slots.find_by_id(&slot.id).await.expect("find").expect("slot");
        assert_eq!(stored.booked_count, 2);
        assert_eq!(store.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_cancel_releases_seats() {
        let (slots, slot) = slot_with(2).await;
        let store = MemoryBookingStore::new(slots.clone());

        let mut booking = store
            .create_reserving(&booking_for(&slot, 2))
            .await
            .expect("reserve");
        assert_eq!(store.count_active_for_slot(slot.id).await.expect("count"), 1);

        booking.cancel(None).expect("cancel");
        store.cancel_releasing(&booking).await.expect("release");

        let stored = slots.find_by_id(&slot.id).await.expect("find").expect("slot");
        assert_eq!(stored.booked_count, 0);
        assert_eq!(store.count_active_for_slot(slot.id).await.expect("count"), 0);
    }
}
