//! Location and location request repository implementations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::location::{Location, LocationRequest, LocationRequestStatus};

use super::db_error;
use crate::traits::{LocationRequestStore, LocationStore};

/// Repository for provider location requests.
#[derive(Debug, Clone)]
pub struct LocationRequestRepository {
    pool: PgPool,
}

impl LocationRequestRepository {
    /// Create a new location request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<LocationRequest, Uuid> for LocationRequestRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<LocationRequest>> {
        sqlx::query_as::<_, LocationRequest>("SELECT * FROM location_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find location request"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<LocationRequest>> {
        let total = self.count().await?;
        let requests = sqlx::query_as::<_, LocationRequest>(
            "SELECT * FROM location_requests ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list location requests"))?;

        Ok(PageResponse::new(requests, page, total))
    }

    async fn create(&self, r: &LocationRequest) -> AppResult<LocationRequest> {
        sqlx::query_as::<_, LocationRequest>(
            "INSERT INTO location_requests (id, provider_id, requested_by, name, address, city, \
             country, latitude, longitude, status, reviewed_by, reviewed_at, review_note, \
             location_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(r.id)
        .bind(r.provider_id)
        .bind(r.requested_by)
        .bind(&r.name)
        .bind(&r.address)
        .bind(&r.city)
        .bind(&r.country)
        .bind(r.latitude)
        .bind(r.longitude)
        .bind(r.status)
        .bind(r.reviewed_by)
        .bind(r.reviewed_at)
        .bind(&r.review_note)
        .bind(r.location_id)
        .bind(r.created_at)
        .bind(r.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create location request"))
    }

    async fn update(&self, r: &LocationRequest) -> AppResult<LocationRequest> {
        sqlx::query_as::<_, LocationRequest>(
            "UPDATE location_requests SET status = $2, reviewed_by = $3, reviewed_at = $4, \
             review_note = $5, location_id = $6, updated_at = $7 WHERE id = $1 RETURNING *",
        )
        .bind(r.id)
        .bind(r.status)
        .bind(r.reviewed_by)
        .bind(r.reviewed_at)
        .bind(&r.review_note)
        .bind(r.location_id)
        .bind(r.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update location request"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM location_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete location request"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM location_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count location requests"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl LocationRequestStore for LocationRequestRepository {
    async fn find_by_status(
        &self,
        status: LocationRequestStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM location_requests WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count location requests"))?;

        let requests = sqlx::query_as::<_, LocationRequest>(
            "SELECT * FROM location_requests WHERE status = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list location requests by status"))?;

        Ok(PageResponse::new(requests, page, total as u64))
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM location_requests WHERE provider_id = $1")
                .bind(provider_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count location requests"))?;

        let requests = sqlx::query_as::<_, LocationRequest>(
            "SELECT * FROM location_requests WHERE provider_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(provider_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list location requests by provider"))?;

        Ok(PageResponse::new(requests, page, total as u64))
    }
}

/// Repository for approved locations.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Create a new location repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Location, Uuid> for LocationRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Location>> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find location"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Location>> {
        let total = self.count().await?;
        let locations = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list locations"))?;

        Ok(PageResponse::new(locations, page, total))
    }

    async fn create(&self, l: &Location) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            "INSERT INTO locations (id, name, address, city, country, latitude, longitude, \
             created_at, created_by) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(l.id)
        .bind(&l.name)
        .bind(&l.address)
        .bind(&l.city)
        .bind(&l.country)
        .bind(l.latitude)
        .bind(l.longitude)
        .bind(l.created_at)
        .bind(l.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create location"))
    }

    async fn update(&self, l: &Location) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            "UPDATE locations SET name = $2, address = $3, city = $4, country = $5, \
             latitude = $6, longitude = $7 WHERE id = $1 RETURNING *",
        )
        .bind(l.id)
        .bind(&l.name)
        .bind(&l.address)
        .bind(&l.city)
        .bind(&l.country)
        .bind(l.latitude)
        .bind(l.longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update location"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete location"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count locations"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl LocationStore for LocationRepository {}
