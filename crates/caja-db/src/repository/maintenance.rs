//! # Maintenance Repository
//!
//! Bulk operations that span every collection.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Row counts removed by [`MaintenanceRepository::wipe_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WipeSummary {
    pub sales: u64,
    pub payments: u64,
    pub withdrawals: u64,
    pub groups: u64,
    pub members: u64,
}

impl WipeSummary {
    /// Total number of rows removed.
    pub fn total(&self) -> u64 {
        self.sales + self.payments + self.withdrawals + self.groups + self.members
    }
}

/// Repository for maintenance operations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    pool: SqlitePool,
}

impl MaintenanceRepository {
    /// Creates a new MaintenanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaintenanceRepository { pool }
    }

    /// Deletes every record of every collection, in one transaction.
    ///
    /// Children go before parents so foreign keys hold at every step.
    pub async fn wipe_all(&self) -> DbResult<WipeSummary> {
        debug!("Wiping all collections");

        let mut tx = self.pool.begin().await?;

        let payments = sqlx::query("DELETE FROM sale_payments")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let sales = sqlx::query("DELETE FROM sales")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let withdrawals = sqlx::query("DELETE FROM withdrawals")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let members = sqlx::query("DELETE FROM group_members")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let groups = sqlx::query("DELETE FROM seller_groups")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        let summary = WipeSummary {
            sales,
            payments,
            withdrawals,
            groups,
            members,
        };

        warn!(
            sales,
            payments,
            withdrawals,
            groups,
            members,
            "All collections wiped"
        );

        Ok(summary)
    }
}
