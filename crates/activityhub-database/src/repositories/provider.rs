//! Activity provider repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::provider::ActivityProvider;

use super::db_error;
use crate::traits::ProviderStore;

/// Repository for activity providers.
#[derive(Debug, Clone)]
pub struct ProviderRepository {
    pool: PgPool,
}

impl ProviderRepository {
    /// Create a new provider repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<ActivityProvider, Uuid> for ProviderRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<ActivityProvider>> {
        sqlx::query_as::<_, ActivityProvider>(
            "SELECT * FROM activity_providers WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find provider"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ActivityProvider>> {
        let total = self.count().await?;
        let providers = sqlx::query_as::<_, ActivityProvider>(
            "SELECT * FROM activity_providers WHERE is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list providers"))?;

        Ok(PageResponse::new(providers, page, total))
    }

    async fn create(&self, provider: &ActivityProvider) -> AppResult<ActivityProvider> {
        sqlx::query_as::<_, ActivityProvider>(
            "INSERT INTO activity_providers (id, owner_user_id, name, description, contact_email, \
             is_verified, created_at, updated_at, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(provider.id)
        .bind(provider.owner_user_id)
        .bind(&provider.name)
        .bind(&provider.description)
        .bind(&provider.contact_email)
        .bind(provider.is_verified)
        .bind(provider.created_at)
        .bind(provider.updated_at)
        .bind(provider.is_deleted)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create provider"))
    }

    async fn update(&self, provider: &ActivityProvider) -> AppResult<ActivityProvider> {
        sqlx::query_as::<_, ActivityProvider>(
            "UPDATE activity_providers SET name = $2, description = $3, contact_email = $4, \
             is_verified = $5, updated_at = $6, is_deleted = $7 WHERE id = $1 RETURNING *",
        )
        .bind(provider.id)
        .bind(&provider.name)
        .bind(&provider.description)
        .bind(&provider.contact_email)
        .bind(provider.is_verified)
        .bind(provider.updated_at)
        .bind(provider.is_deleted)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update provider"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM activity_providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete provider"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_providers WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count providers"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ProviderStore for ProviderRepository {
    async fn find_by_owner(&self, owner_user_id: Uuid) -> AppResult<Vec<ActivityProvider>> {
        sqlx::query_as::<_, ActivityProvider>(
            "SELECT * FROM activity_providers WHERE owner_user_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC",
        )
        .bind(owner_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to find providers by owner"))
    }
}
