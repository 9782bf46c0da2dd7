//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::notification::Notification;

use super::db_error;
use crate::traits::NotificationStore;

/// Repository for in-app notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Notification, Uuid> for NotificationRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find notification"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Notification>> {
        let total = self.count().await?;
        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list notifications"))?;

        Ok(PageResponse::new(notifs, page, total))
    }

    async fn create(&self, n: &Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, kind, title, message, resource_type, \
             resource_id, is_read, read_at, created_at, is_deleted, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(n.id)
        .bind(n.user_id)
        .bind(&n.kind)
        .bind(&n.title)
        .bind(&n.message)
        .bind(&n.resource_type)
        .bind(n.resource_id)
        .bind(n.is_read)
        .bind(n.read_at)
        .bind(n.created_at)
        .bind(n.is_deleted)
        .bind(n.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create notification"))
    }

    async fn update(&self, n: &Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = $2, read_at = $3, is_deleted = $4, \
             deleted_at = $5 WHERE id = $1 RETURNING *",
        )
        .bind(n.id)
        .bind(n.is_read)
        .bind(n.read_at)
        .bind(n.is_deleted)
        .bind(n.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update notification"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete notification"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count notifications"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn find_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_deleted = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count notifications"))?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list notifications"))?;

        Ok(PageResponse::new(notifs, page, total as u64))
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND is_read = FALSE AND is_deleted = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count unread notifications"))?;
        Ok(count as u64)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE user_id = $1 AND is_read = FALSE AND is_deleted = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to mark all read"))?;
        Ok(result.rows_affected())
    }
}
