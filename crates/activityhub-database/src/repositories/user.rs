//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::user::User;

use super::db_error;
use crate::traits::UserStore;

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User, Uuid> for UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, full_name, role, is_active, \
             last_login_at, created_at, updated_at, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.is_deleted)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create user"))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET full_name = $2, role = $3, is_active = $4, last_login_at = $5, \
             password_hash = $6, updated_at = $7, is_deleted = $8 \
             WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .bind(user.is_deleted)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update user"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user by email"))
    }
}
