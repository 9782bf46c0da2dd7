//! Booking repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::booking::{Booking, BookingStatus};

use super::db_error;
use crate::traits::BookingStore;
use crate::unit_of_work::UnitOfWork;

const INSERT_BOOKING: &str = "INSERT INTO bookings (id, customer_id, activity_id, provider_id, \
     time_slot_id, participants, total_cents, discount_cents, amount_due_cents, currency, \
     gift_card_code, payment_reference, status, confirmed_at, checked_in_at, completed_at, \
     cancelled_at, cancellation_reason, created_at, updated_at, created_by) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
     $19, $20, $21) RETURNING *";

const UPDATE_BOOKING: &str = "UPDATE bookings SET discount_cents = $2, amount_due_cents = $3, \
     gift_card_code = $4, payment_reference = $5, status = $6, confirmed_at = $7, \
     checked_in_at = $8, completed_at = $9, cancelled_at = $10, cancellation_reason = $11, \
     updated_at = $12 WHERE id = $1 RETURNING *";

/// Repository for bookings.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(conn: &mut sqlx::PgConnection, b: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(INSERT_BOOKING)
            .bind(b.id)
            .bind(b.customer_id)
            .bind(b.activity_id)
            .bind(b.provider_id)
            .bind(b.time_slot_id)
            .bind(b.participants)
            .bind(b.total_cents)
            .bind(b.discount_cents)
            .bind(b.amount_due_cents)
            .bind(&b.currency)
            .bind(&b.gift_card_code)
            .bind(&b.payment_reference)
            .bind(b.status)
            .bind(b.confirmed_at)
            .bind(b.checked_in_at)
            .bind(b.completed_at)
            .bind(b.cancelled_at)
            .bind(&b.cancellation_reason)
            .bind(b.created_at)
            .bind(b.updated_at)
            .bind(b.created_by)
            .fetch_one(conn)
            .await
            .map_err(db_error("Failed to create booking"))
    }

    async fn write(conn: &mut sqlx::PgConnection, b: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(UPDATE_BOOKING)
            .bind(b.id)
            .bind(b.discount_cents)
            .bind(b.amount_due_cents)
            .bind(&b.gift_card_code)
            .bind(&b.payment_reference)
            .bind(b.status)
            .bind(b.confirmed_at)
            .bind(b.checked_in_at)
            .bind(b.completed_at)
            .bind(b.cancelled_at)
            .bind(&b.cancellation_reason)
            .bind(b.updated_at)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to update booking"))?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", b.id)))
    }
}

#[async_trait]
impl Repository<Booking, Uuid> for BookingRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find booking"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>> {
        let total = self.count().await?;
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bookings"))?;

        Ok(PageResponse::new(bookings, page, total))
    }

    async fn create(&self, booking: &Booking) -> AppResult<Booking> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("Failed to acquire connection"))?;
        Self::insert(&mut conn, booking).await
    }

    async fn update(&self, booking: &Booking) -> AppResult<Booking> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("Failed to acquire connection"))?;
        Self::write(&mut conn, booking).await
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete booking"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count bookings"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn create_reserving(&self, booking: &Booking) -> AppResult<Booking> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let reserved = sqlx::query(
            "UPDATE time_slots SET booked_count = booked_count + $2, updated_at = NOW() \
             WHERE id = $1 AND is_cancelled = FALSE AND booked_count + $2 <= capacity",
        )
        .bind(booking.time_slot_id)
        .bind(booking.participants)
        .execute(uow.conn())
        .await
        .map_err(db_error("Failed to reserve seats"))?;

        if reserved.rows_affected() == 0 {
            let state: Option<(bool, i32)> = sqlx::query_as(
                "SELECT is_cancelled, capacity - booked_count FROM time_slots WHERE id = $1",
            )
            .bind(booking.time_slot_id)
            .fetch_optional(uow.conn())
            .await
            .map_err(db_error("Failed to load time slot"))?;
            uow.rollback().await?;

            return Err(match state {
                None => AppError::not_found(format!(
                    "Time slot {} not found",
                    booking.time_slot_id
                )),
                Some((true, _)) => AppError::invalid_state("Time slot has been cancelled"),
                Some((false, remaining)) => AppError::conflict(format!(
                    "Only {remaining} seat(s) left in this time slot"
                )),
            });
        }

        let created = Self::insert(uow.conn(), booking).await?;
        uow.commit().await?;
        debug!(booking_id = %created.id, slot_id = %created.time_slot_id, "Seats reserved");
        Ok(created)
    }

    async fn cancel_releasing(&self, booking: &Booking) -> AppResult<Booking> {
        if booking.status != BookingStatus::Cancelled {
            return Err(AppError::invalid_state(format!(
                "Booking {} is {}, not cancelled",
                booking.id, booking.status
            )));
        }
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let stored = Self::write(uow.conn(), booking).await?;
        sqlx::query(
            "UPDATE time_slots SET booked_count = GREATEST(booked_count - $2, 0), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(booking.time_slot_id)
        .bind(booking.participants)
        .execute(uow.conn())
        .await
        .map_err(db_error("Failed to release seats"))?;

        uow.commit().await?;
        Ok(stored)
    }

    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count customer bookings"))?;

        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(customer_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list customer bookings"))?;

        Ok(PageResponse::new(bookings, page, total as u64))
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE provider_id = $1")
            .bind(provider_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count provider bookings"))?;

        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE provider_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(provider_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list provider bookings"))?;

        Ok(PageResponse::new(bookings, page, total as u64))
    }

    async fn count_active_for_slot(&self, time_slot_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE time_slot_id = $1 \
             AND status IN ('pending', 'confirmed', 'checked_in')",
        )
        .bind(time_slot_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count active bookings"))?;
        Ok(count as u64)
    }
}
