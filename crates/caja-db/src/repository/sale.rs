//! # Sale Repository
//!
//! Database operations for sales and their payment history.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create(NewSale) → Sale { Pending, balance = total }            │
//! │                         → Sale { Paid,    balance = 0 }                │
//! │                                                                         │
//! │  2. PAY (any number of times)                                          │
//! │     └── apply_payment(id, amount)                                      │
//! │         ├── read sale + version                                        │
//! │         ├── caja_core::apply_payment (pure, may reject)                │
//! │         └── BEGIN                                                      │
//! │               UPDATE sales ... WHERE id = ? AND version = ?            │
//! │               INSERT INTO sale_payments ...                            │
//! │             COMMIT          (0 rows updated → retry from the read)     │
//! │                                                                         │
//! │  3. UPDATE / CANCEL                                                    │
//! │     └── update(id, SaleChanges) → same guarded write                   │
//! │                                                                         │
//! │  4. DELETE                                                             │
//! │     └── delete(id) → payments go with it (ON DELETE CASCADE)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Compare-and-Swap
//! Every mutation bumps `version`. A write only lands if the row still has
//! the version that was read, so two payments racing on the same sale can
//! never both apply against the same balance: the loser re-reads and runs
//! the engine again on the fresh state.

use std::collections::HashMap;

use caja_core::status::apply_changes;
use caja_core::{
    apply_payment, Money, NewSale, PaymentOutcome, Sale, SaleChanges, SalePayment, SaleStatus,
};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// How many times a guarded write is attempted before giving up.
pub const MAX_CAS_ATTEMPTS: u32 = 5;

/// Row shape of the `sales` table (the payment history lives elsewhere).
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    seller: String,
    customer: String,
    total_cents: i64,
    balance_remaining_cents: i64,
    status: SaleStatus,
    description: Option<String>,
    product: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl SaleRow {
    fn into_sale(self, payments: Vec<SalePayment>) -> Sale {
        Sale {
            id: self.id,
            seller: self.seller,
            customer: self.customer,
            total_cents: self.total_cents,
            balance_remaining_cents: self.balance_remaining_cents,
            status: self.status,
            description: self.description,
            product: self.product,
            payments,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }
}

const SELECT_SALE: &str = r#"
    SELECT
        id, seller, customer, total_cents, balance_remaining_cents,
        status, description, product, created_at, updated_at, version
    FROM sales
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Stores a new sale.
    ///
    /// ## Returns
    /// The created sale with its generated ID and an empty payment history.
    pub async fn create(&self, new: NewSale) -> DbResult<Sale> {
        let sale = new.into_sale(Uuid::new_v4().to_string(), Utc::now());

        debug!(id = %sale.id, seller = %sale.seller, status = ?sale.status, "Creating sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, seller, customer, total_cents, balance_remaining_cents,
                status, description, product, created_at, updated_at, version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.seller)
        .bind(&sale.customer)
        .bind(sale.total_cents)
        .bind(sale.balance_remaining_cents)
        .bind(sale.status)
        .bind(&sale.description)
        .bind(&sale.product)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .bind(sale.version)
        .execute(&self.pool)
        .await?;

        info!(id = %sale.id, total = %sale.total(), "Sale created");
        Ok(sale)
    }

    /// Gets a sale by ID, with its payment history.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        debug!(id = %id, "Fetching sale");

        let mut conn = self.pool.acquire().await?;
        load_sale(&mut conn, id).await
    }

    /// Lists every sale, newest first, each with its payment history.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        debug!("Listing sales");

        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{SELECT_SALE} ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        let payments = sqlx::query_as::<_, SalePayment>(
            r#"
            SELECT id, sale_id, amount_cents, paid_at
            FROM sale_payments
            ORDER BY paid_at ASC, rowid ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut by_sale: HashMap<String, Vec<SalePayment>> = HashMap::new();
        for payment in payments {
            by_sale
                .entry(payment.sale_id.clone())
                .or_default()
                .push(payment);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let history = by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(history)
            })
            .collect())
    }

    /// Applies a payment to a sale.
    ///
    /// Runs the payment engine against the current state of the sale and
    /// persists the outcome with a guarded update, retrying against fresh
    /// state when a concurrent write got there first.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the sale doesn't exist
    /// - [`DbError::Domain`] if the engine rejects the payment (nothing is written)
    /// - [`DbError::Contention`] after [`MAX_CAS_ATTEMPTS`] lost races
    pub async fn apply_payment(
        &self,
        id: &str,
        requested: Money,
    ) -> DbResult<(Sale, PaymentOutcome)> {
        debug!(id = %id, requested = %requested, "Applying payment");

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let sale = self.require(id).await?;
            let outcome = apply_payment(&sale, requested)?;
            let now = Utc::now();

            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query(
                r#"
                UPDATE sales
                SET balance_remaining_cents = ?1,
                    status = ?2,
                    updated_at = ?3,
                    version = version + 1
                WHERE id = ?4 AND version = ?5
                "#,
            )
            .bind(outcome.balance_remaining.cents())
            .bind(outcome.status)
            .bind(now)
            .bind(id)
            .bind(sale.version)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                tx.rollback().await?;
                warn!(id = %id, attempt, "Sale changed while applying payment, retrying");
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO sale_payments (id, sale_id, amount_cents, paid_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(id)
            .bind(outcome.applied.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let stored = load_sale(&mut tx, id)
                .await?
                .ok_or_else(|| DbError::not_found("Sale", id))?;

            tx.commit().await?;

            if outcome.clamped {
                info!(
                    id = %id,
                    requested = %requested,
                    applied = %outcome.applied,
                    "Payment adjusted to the remaining balance"
                );
            }
            info!(
                id = %id,
                applied = %outcome.applied,
                balance_remaining = %outcome.balance_remaining,
                status = ?outcome.status,
                "Payment applied"
            );

            return Ok((stored, outcome));
        }

        Err(DbError::contention("Sale", id))
    }

    /// Applies field changes to a sale.
    ///
    /// The total is immutable and status changes follow
    /// [`caja_core::status::transition`]. Uses the same guarded write as
    /// [`SaleRepository::apply_payment`].
    pub async fn update(&self, id: &str, changes: &SaleChanges) -> DbResult<Sale> {
        debug!(id = %id, ?changes, "Updating sale");

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let sale = self.require(id).await?;
            let updated = apply_changes(&sale, changes)?;

            if changes.is_empty() {
                return Ok(sale);
            }

            let now = Utc::now();
            let mut tx = self.pool.begin().await?;

            let rows = sqlx::query(
                r#"
                UPDATE sales
                SET seller = ?1,
                    customer = ?2,
                    description = ?3,
                    product = ?4,
                    status = ?5,
                    balance_remaining_cents = ?6,
                    updated_at = ?7,
                    version = version + 1
                WHERE id = ?8 AND version = ?9
                "#,
            )
            .bind(&updated.seller)
            .bind(&updated.customer)
            .bind(&updated.description)
            .bind(&updated.product)
            .bind(updated.status)
            .bind(updated.balance_remaining_cents)
            .bind(now)
            .bind(id)
            .bind(sale.version)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if rows == 0 {
                tx.rollback().await?;
                warn!(id = %id, attempt, "Sale changed while updating, retrying");
                continue;
            }

            let stored = load_sale(&mut tx, id)
                .await?
                .ok_or_else(|| DbError::not_found("Sale", id))?;

            tx.commit().await?;

            if stored.status != sale.status {
                info!(id = %id, from = ?sale.status, to = ?stored.status, "Sale status changed");
            }
            return Ok(stored);
        }

        Err(DbError::contention("Sale", id))
    }

    /// Deletes a sale and its payment history.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id = %id, "Sale deleted");
        Ok(())
    }

    async fn require(&self, id: &str) -> DbResult<Sale> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }
}

/// Loads one sale and its history over a single connection.
async fn load_sale(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let row = sqlx::query_as::<_, SaleRow>(&format!("{SELECT_SALE} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let payments = sqlx::query_as::<_, SalePayment>(
        r#"
        SELECT id, sale_id, amount_cents, paid_at
        FROM sale_payments
        WHERE sale_id = ?1
        ORDER BY paid_at ASC, rowid ASC
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(row.into_sale(payments)))
}

// =============================================================================
// Unit Tests
// =============================================================================
