//! Time slot entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

/// A dated occurrence of an activity with limited seats.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: Uuid,
    /// The activity this slot belongs to.
    pub activity_id: Uuid,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    pub ends_at: DateTime<Utc>,
    /// Total seats.
    pub capacity: i32,
    /// Seats held by pending, confirmed, or checked-in bookings.
    pub booked_count: i32,
    /// Whether the provider cancelled this slot.
    pub is_cancelled: bool,
    /// When the slot was created.
    pub created_at: DateTime<Utc>,
    /// When the slot was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Create a slot. The end must follow the start and capacity must be positive.
    pub fn new(
        activity_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        capacity: i32,
    ) -> Result<Self, AppError> {
        if ends_at <= starts_at {
            return Err(AppError::validation("Time slot must end after it starts"));
        }
        if capacity <= 0 {
            return Err(AppError::validation("Time slot capacity must be positive"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            activity_id,
            starts_at,
            ends_at,
            capacity,
            booked_count: 0,
            is_cancelled: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Seats still available.
    pub fn remaining(&self) -> i32 {
        (self.capacity - self.booked_count).max(0)
    }

    /// Whether the slot has already started.
    pub fn has_started(&self) -> bool {
        self.starts_at <= Utc::now()
    }

    /// Hold seats for a booking.
    pub fn reserve(&mut self, seats: i32) -> Result<(), AppError> {
        if self.is_cancelled {
            return Err(AppError::invalid_state("Time slot has been cancelled"));
        }
        if seats <= 0 {
            return Err(AppError::validation("At least one participant is required"));
        }
        if seats > self.remaining() {
            return Err(AppError::conflict(format!(
                "Only {} seat(s) left in this time slot",
                self.remaining()
            )));
        }
        self.booked_count += seats;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Give back seats from a cancelled booking.
    pub fn release(&mut self, seats: i32) {
        self.booked_count = (self.booked_count - seats.max(0)).max(0);
        self.updated_at = Utc::now();
    }

    /// Cancel the slot.
    pub fn cancel(&mut self) -> Result<(), AppError> {
        if self.is_cancelled {
            return Err(AppError::invalid_state("Time slot is already cancelled"));
        }
        self.is_cancelled = true;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;
    use chrono::Duration;

    use super::*;

    fn slot(capacity: i32) -> TimeSlot {
        let start = Utc::now() + Duration::days(1);
        TimeSlot::new(Uuid::new_v4(), start, start + Duration::hours(2), capacity)
            .expect("valid slot")
    }

    #[test]
    fn test_rejects_inverted_range() {
        let start = Utc::now();
        let err = TimeSlot::new(Uuid::new_v4(), start, start, 4).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_reserve_never_exceeds_capacity() {
        let mut slot = slot(3);
        slot.reserve(2).expect("two seats");
        let err = slot.reserve(2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(slot.booked_count, 2);
        slot.release(2);
        assert_eq!(slot.remaining(), 3);
    }

    #[test]
    fn test_cancelled_slot_rejects_reservations() {
        let mut slot = slot(3);
        slot.cancel().expect("cancel");
        assert_eq!(slot.reserve(1).unwrap_err().kind, ErrorKind::InvalidState);
    }
}
