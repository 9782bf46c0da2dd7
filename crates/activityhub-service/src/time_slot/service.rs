//! Time slot scheduling.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_database::traits::{ActivityStore, BookingStore, ProviderStore, TimeSlotStore};
use activityhub_entity::activity::ActivityStatus;
use activityhub_entity::time_slot::TimeSlot;

use crate::access::{load_activity, owned_activity};
use crate::context::RequestContext;

/// Input for a new time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeSlot {
    /// Start of the slot.
    pub starts_at: DateTime<Utc>,
    /// End of the slot.
    pub ends_at: DateTime<Utc>,
    /// Seats. Defaults to the activity's capacity.
    pub capacity: Option<i32>,
}

/// Manages time slots of activities.
#[derive(Debug, Clone)]
pub struct TimeSlotService {
    time_slots: Arc<dyn TimeSlotStore>,
    activities: Arc<dyn ActivityStore>,
    providers: Arc<dyn ProviderStore>,
    bookings: Arc<dyn BookingStore>,
}

impl TimeSlotService {
    /// Creates a new time slot service.
    pub fn new(
        time_slots: Arc<dyn TimeSlotStore>,
        activities: Arc<dyn ActivityStore>,
        providers: Arc<dyn ProviderStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            time_slots,
            activities,
            providers,
            bookings,
        }
    }

    /// Add a slot to an activity the caller owns.
    pub async fn add_time_slot(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
        input: NewTimeSlot,
    ) -> AppResult<TimeSlot> {
        let user_id = ctx.require_user()?;
        let (activity, _) = owned_activity(
            self.activities.as_ref(),
            self.providers.as_ref(),
            user_id,
            activity_id,
        )
        .await?;

        if activity.status == ActivityStatus::Archived {
            return Err(AppError::invalid_state(
                "Cannot add time slots to an archived activity",
            ));
        }
        if input.starts_at <= Utc::now() {
            return Err(AppError::validation("Time slot must start in the future"));
        }

        let slot = TimeSlot::new(
            activity.id,
            input.starts_at,
            input.ends_at,
            input.capacity.unwrap_or(activity.capacity),
        )?;
        let slot = self.time_slots.create(&slot).await?;

        info!(time_slot_id = %slot.id, activity_id = %activity.id, "Time slot added");
        Ok(slot)
    }

    /// Slots of an activity ordered by start time.
    pub async fn list_time_slots(&self, activity_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        load_activity(self.activities.as_ref(), activity_id).await?;
        self.time_slots.find_by_activity(activity_id).await
    }

    /// Cancel a slot that has no active bookings.
    pub async fn cancel_time_slot(
        &self,
        ctx: &RequestContext,
        time_slot_id: Uuid,
    ) -> AppResult<TimeSlot> {
        let user_id = ctx.require_user()?;
        let slot = self
            .time_slots
            .find_by_id(&time_slot_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Time slot {time_slot_id} not found")))?;
        owned_activity(
            self.activities.as_ref(),
            self.providers.as_ref(),
            user_id,
            slot.activity_id,
        )
        .await?;

        let active = self.bookings.count_active_for_slot(slot.id).await?;
        if active > 0 {
            return Err(AppError::conflict(format!(
                "Cannot cancel a time slot with {active} active booking(s)"
            )));
        }

        let slot = self
            .time_slots
            .mark_cancelled(slot.id, slot.booked_count)
            .await?;

        info!(time_slot_id = %slot.id, "Time slot cancelled");
        Ok(slot)
    }
}
