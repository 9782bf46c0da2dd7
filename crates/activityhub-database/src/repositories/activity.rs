//! Activity repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::activity::{Activity, ActivityStatus};

use super::db_error;
use crate::traits::ActivityStore;

/// Repository for activities.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Activity, Uuid> for ActivityRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Activity>> {
        sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find activity"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Activity>> {
        let total = self.count().await?;
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list activities"))?;

        Ok(PageResponse::new(activities, page, total))
    }

    async fn create(&self, activity: &Activity) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>(
            "INSERT INTO activities (id, provider_id, location_id, title, description, category, \
             price_cents, currency, capacity, status, published_at, archived_at, created_at, \
             updated_at, created_by, is_deleted, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING *",
        )
        .bind(activity.id)
        .bind(activity.provider_id)
        .bind(activity.location_id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(activity.price_cents)
        .bind(&activity.currency)
        .bind(activity.capacity)
        .bind(activity.status)
        .bind(activity.published_at)
        .bind(activity.archived_at)
        .bind(activity.created_at)
        .bind(activity.updated_at)
        .bind(activity.created_by)
        .bind(activity.is_deleted)
        .bind(activity.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create activity"))
    }

    async fn update(&self, activity: &Activity) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>(
            "UPDATE activities SET location_id = $2, title = $3, description = $4, category = $5, \
             price_cents = $6, capacity = $7, status = $8, published_at = $9, archived_at = $10, \
             updated_at = $11, is_deleted = $12, deleted_at = $13 \
             WHERE id = $1 RETURNING *",
        )
        .bind(activity.id)
        .bind(activity.location_id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(activity.price_cents)
        .bind(activity.capacity)
        .bind(activity.status)
        .bind(activity.published_at)
        .bind(activity.archived_at)
        .bind(activity.updated_at)
        .bind(activity.is_deleted)
        .bind(activity.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update activity"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete activity"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count activities"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn find_published(
        &self,
        page: &PageRequest,
        category: Option<&str>,
    ) -> AppResult<PageResponse<Activity>> {
        let category = category.map(str::to_lowercase);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities \
             WHERE status = $1 AND is_deleted = FALSE AND ($2::TEXT IS NULL OR category = $2)",
        )
        .bind(ActivityStatus::Published)
        .bind(&category)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count published activities"))?;

        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities \
             WHERE status = $1 AND is_deleted = FALSE AND ($2::TEXT IS NULL OR category = $2) \
             ORDER BY published_at DESC NULLS LAST, created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(ActivityStatus::Published)
        .bind(&category)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list published activities"))?;

        Ok(PageResponse::new(activities, page, total as u64))
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Activity>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities WHERE provider_id = $1 AND is_deleted = FALSE",
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count provider activities"))?;

        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE provider_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(provider_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list provider activities"))?;

        Ok(PageResponse::new(activities, page, total as u64))
    }
}
