//! # Withdrawal Repository
//!
//! Cash taken out of the till. Create, list and delete only.

use caja_core::{CoreError, Money, Withdrawal};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for withdrawal database operations.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    pool: SqlitePool,
}

impl WithdrawalRepository {
    /// Creates a new WithdrawalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WithdrawalRepository { pool }
    }

    /// Records a withdrawal.
    ///
    /// ## Arguments
    /// * `amount` - Amount taken out, must be positive
    /// * `description` - Already validated, non-empty reason
    pub async fn create(&self, amount: Money, description: String) -> DbResult<Withdrawal> {
        if !amount.is_positive() {
            return Err(CoreError::invalid_amount(format!(
                "withdrawal amount {} is not a positive amount",
                amount
            ))
            .into());
        }

        let withdrawal = Withdrawal {
            id: Uuid::new_v4().to_string(),
            amount_cents: amount.cents(),
            description,
            created_at: Utc::now(),
        };

        debug!(id = %withdrawal.id, amount = %amount, "Creating withdrawal");

        sqlx::query(
            r#"
            INSERT INTO withdrawals (id, amount_cents, description, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&withdrawal.id)
        .bind(withdrawal.amount_cents)
        .bind(&withdrawal.description)
        .bind(withdrawal.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %withdrawal.id, amount = %amount, "Withdrawal recorded");
        Ok(withdrawal)
    }

    /// Lists withdrawals, newest first.
    pub async fn list(&self) -> DbResult<Vec<Withdrawal>> {
        debug!("Listing withdrawals");

        let withdrawals = sqlx::query_as::<_, Withdrawal>(
            r#"
            SELECT id, amount_cents, description, created_at
            FROM withdrawals
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(withdrawals)
    }

    /// Deletes a withdrawal.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting withdrawal");

        let result = sqlx::query("DELETE FROM withdrawals WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Withdrawal", id));
        }

        Ok(())
    }
}
