//! Gift card repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_entity::gift_card::GiftCard;

use super::db_error;
use crate::traits::GiftCardStore;
use crate::unit_of_work::UnitOfWork;

/// Repository for gift cards.
#[derive(Debug, Clone)]
pub struct GiftCardRepository {
    pool: PgPool,
}

impl GiftCardRepository {
    /// Create a new gift card repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<GiftCard, Uuid> for GiftCardRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<GiftCard>> {
        sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find gift card"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<GiftCard>> {
        let total = self.count().await?;
        let cards = sqlx::query_as::<_, GiftCard>(
            "SELECT * FROM gift_cards ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list gift cards"))?;

        Ok(PageResponse::new(cards, page, total))
    }

    async fn create(&self, card: &GiftCard) -> AppResult<GiftCard> {
        sqlx::query_as::<_, GiftCard>(
            "INSERT INTO gift_cards (id, code, initial_cents, balance_cents, currency, \
             purchased_by, expires_at, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(card.id)
        .bind(&card.code)
        .bind(card.initial_cents)
        .bind(card.balance_cents)
        .bind(&card.currency)
        .bind(card.purchased_by)
        .bind(card.expires_at)
        .bind(card.is_active)
        .bind(card.created_at)
        .bind(card.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create gift card"))
    }

    async fn update(&self, card: &GiftCard) -> AppResult<GiftCard> {
        sqlx::query_as::<_, GiftCard>(
            "UPDATE gift_cards SET balance_cents = $2, expires_at = $3, is_active = $4, \
             updated_at = $5 WHERE id = $1 RETURNING *",
        )
        .bind(card.id)
        .bind(card.balance_cents)
        .bind(card.expires_at)
        .bind(card.is_active)
        .bind(card.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to update gift card"))
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM gift_cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete gift card"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gift_cards")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count gift cards"))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl GiftCardStore for GiftCardRepository {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<GiftCard>> {
        sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE code = UPPER($1)")
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find gift card by code"))
    }

    async fn redeem(&self, code: &str, amount_cents: i64) -> AppResult<i64> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let card = sqlx::query_as::<_, GiftCard>(
            "SELECT * FROM gift_cards WHERE code = UPPER($1) FOR UPDATE",
        )
        .bind(code.trim())
        .fetch_optional(uow.conn())
        .await
        .map_err(db_error("Failed to lock gift card"))?;
        let Some(mut card) = card else {
            uow.rollback().await?;
            return Err(AppError::not_found("Gift card not found"));
        };

        let applied = match card.redeem(amount_cents) {
            Ok(applied) => applied,
            Err(e) => {
                uow.rollback().await?;
                return Err(e);
            }
        };

        sqlx::query("UPDATE gift_cards SET balance_cents = $2, updated_at = $3 WHERE id = $1")
            .bind(card.id)
            .bind(card.balance_cents)
            .bind(card.updated_at)
            .execute(uow.conn())
            .await
            .map_err(db_error("Failed to redeem gift card"))?;

        uow.commit().await?;
        Ok(applied)
    }

    async fn restore(&self, code: &str, amount_cents: i64) -> AppResult<()> {
        if amount_cents <= 0 {
            return Ok(());
        }
        let result = sqlx::query(
            "UPDATE gift_cards SET balance_cents = LEAST(balance_cents + $2, initial_cents), \
             updated_at = NOW() WHERE code = UPPER($1)",
        )
        .bind(code.trim())
        .bind(amount_cents)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to restore gift card balance"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Gift card not found"));
        }
        Ok(())
    }
}
