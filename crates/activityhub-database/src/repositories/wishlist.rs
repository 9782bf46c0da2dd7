//! Wishlist repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::wishlist::WishlistItem;

use super::db_error;
use crate::traits::WishlistStore;

/// Repository for wishlist entries. Entries are deleted physically.
#[derive(Debug, Clone)]
pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    /// Create a new wishlist repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<WishlistItem, Uuid> for WishlistRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<WishlistItem>> {
        sqlx::query_as::<_, WishlistItem>("SELECT * FROM wishlist_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find wishlist entry"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<WishlistItem>> {
        let total = self.count().await?;
        let items = sqlx::query_as::<_, WishlistItem>(
            "SELECT * FROM wishlist_items ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list wishlist entries"))?;

        Ok(PageResponse::new(items, page, total))
    }

    async fn create(&self, item: &WishlistItem) -> AppResult<WishlistItem> {
        sqlx::query_as::<_, WishlistItem>(
            "INSERT INTO wishlist_items (id, customer_id, activity_id, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(item.id)
        .bind(item.customer_id)
        .bind(item.activity_id)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create wishlist entry"))
    }

    async fn update(&self, item: &WishlistItem) -> AppResult<WishlistItem> {
        // Entries have no mutable fields.
        self.find_by_id(&item.id).await?.ok_or_else(|| {
            activityhub_core::AppError::not_found(format!("Wishlist entry {} not found", item.id))
        })
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete wishlist entry"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wishlist_items")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count wishlist entries"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl WishlistStore for WishlistRepository {
    async fn find_by_customer(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<WishlistItem>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM wishlist_items WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count wishlist"))?;

        let items = sqlx::query_as::<_, WishlistItem>(
            "SELECT * FROM wishlist_items WHERE customer_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(customer_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list wishlist"))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    async fn find_entry(
        &self,
        customer_id: Uuid,
        activity_id: Uuid,
    ) -> AppResult<Option<WishlistItem>> {
        sqlx::query_as::<_, WishlistItem>(
            "SELECT * FROM wishlist_items WHERE customer_id = $1 AND activity_id = $2",
        )
        .bind(customer_id)
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find wishlist entry"))
    }
}
