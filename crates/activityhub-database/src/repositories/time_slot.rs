//! Time slot repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::time_slot::TimeSlot;

use super::db_error;
use crate::traits::TimeSlotStore;

/// Repository for activity time slots.
#[derive(Debug, Clone)]
pub struct TimeSlotRepository {
    pool: PgPool,
}

impl TimeSlotRepository {
    /// Create a new time slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<TimeSlot, Uuid> for TimeSlotRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>("SELECT * FROM time_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find time slot"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<TimeSlot>> {
        let total = self.count().await?;
        let slots = sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots ORDER BY starts_at LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list time slots"))?;

        Ok(PageResponse::new(slots, page, total))
    }

    async fn create(&self, slot: &TimeSlot) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>(
            "INSERT INTO time_slots (id, activity_id, starts_at, ends_at, capacity, booked_count, \
             is_cancelled, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(slot.id)
        .bind(slot.activity_id)
        .bind(slot.starts_at)
        .bind(slot.ends_at)
        .bind(slot.capacity)
        .bind(slot.booked_count)
        .bind(slot.is_cancelled)
        .bind(slot.created_at)
        .bind(slot.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create time slot"))
    }

    /// Seat counts are owned by the booking store; only schedule and
    /// cancellation fields are written here.
    async fn update(&self, slot: &TimeSlot) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>(
            "UPDATE time_slots SET starts_at = $2, ends_at = $3, capacity = $4, \
             is_cancelled = $5, updated_at = $6 WHERE id = $1 RETURNING *",
        )
        .bind(slot.id)
        .bind(slot.starts_at)
        .bind(slot.ends_at)
        .bind(slot.capacity)
        .bind(slot.is_cancelled)
        .bind(slot.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update time slot"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM time_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete time slot"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_slots")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count time slots"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl TimeSlotStore for TimeSlotRepository {
    async fn find_by_activity(&self, activity_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE activity_id = $1 ORDER BY starts_at",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list time slots for activity"))
    }

    async fn mark_cancelled(&self, id: Uuid, booked_count: i32) -> AppResult<TimeSlot> {
        let cancelled = sqlx::query_as::<_, TimeSlot>(
            "UPDATE time_slots SET is_cancelled = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_cancelled = FALSE AND booked_count = $2 RETURNING *",
        )
        .bind(id)
        .bind(booked_count)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to cancel time slot"))?;
        if let Some(slot) = cancelled {
            return Ok(slot);
        }

        match self.find_by_id(&id).await? {
            None => Err(AppError::not_found(format!("Time slot {id} not found"))),
            Some(slot) if slot.is_cancelled => {
                Err(AppError::invalid_state("Time slot is already cancelled"))
            }
            Some(_) => Err(AppError::conflict(
                "Time slot bookings changed while cancelling; try again",
            )),
        }
    }
}
