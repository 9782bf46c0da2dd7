//! Transaction wrapper with begin/commit/rollback passthrough.

use sqlx::{PgPool, Postgres, Transaction};

use activityhub_core::error::{AppError, ErrorKind};
use activityhub_core::result::AppResult;

/// A single database transaction.
///
/// Dropping an uncommitted unit of work rolls it back.
#[derive(Debug)]
pub struct UnitOfWork<'c> {
    tx: Transaction<'c, Postgres>,
}

impl UnitOfWork<'static> {
    /// Begin a transaction on the pool.
    pub async fn begin(pool: &PgPool) -> AppResult<Self> {
        let tx = pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Self { tx })
    }
}

impl<'c> UnitOfWork<'c> {
    /// The connection to run statements on.
    pub fn conn(&mut self) -> &mut sqlx::PgConnection {
        &mut self.tx
    }

    /// Commit the transaction.
    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    /// Roll the transaction back.
    pub async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
