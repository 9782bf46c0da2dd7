//! Customer profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::customer::Customer;

use super::db_error;
use crate::traits::CustomerStore;

/// Repository for customer profiles.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Customer, Uuid> for CustomerRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find customer"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Customer>> {
        let total = self.count().await?;
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list customers"))?;

        Ok(PageResponse::new(customers, page, total))
    }

    async fn create(&self, customer: &Customer) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, user_id, display_name, phone, loyalty_points, \
             created_at, updated_at, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(customer.id)
        .bind(customer.user_id)
        .bind(&customer.display_name)
        .bind(&customer.phone)
        .bind(customer.loyalty_points)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .bind(customer.is_deleted)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create customer"))
    }

    async fn update(&self, customer: &Customer) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "UPDATE customers SET display_name = $2, phone = $3, loyalty_points = $4, \
             updated_at = $5, is_deleted = $6 WHERE id = $1 RETURNING *",
        )
        .bind(customer.id)
        .bind(&customer.display_name)
        .bind(&customer.phone)
        .bind(customer.loyalty_points)
        .bind(customer.updated_at)
        .bind(customer.is_deleted)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update customer"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete customer"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count customers"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE user_id = $1 AND is_deleted = FALSE",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find customer by user"))
    }
}
