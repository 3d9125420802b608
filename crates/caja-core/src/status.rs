//! # Status Transitions
//!
//! Status changes requested through a generic sale update (as opposed to the
//! ones derived by the payment engine).
//!
//! ```text
//!                 manual settlement
//!   ┌──────────┐  (balance → 0)       ┌──────────┐
//!   │ Pending  │ ───────────────────► │   Paid   │
//!   └────┬─────┘ ◄───── ✗ ─────────── └────┬─────┘
//!        │                                 │
//!        │ cancel                   cancel │
//!        ▼                                 ▼
//!   ┌──────────────────────────────────────────┐
//!   │ Cancelled (terminal, balance frozen)     │
//!   └──────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Sale, SaleChanges, SaleStatus};

/// Computes the balance that results from moving `sale` to `target`.
///
/// ## Errors
/// [`CoreError::InvalidState`] when leaving `Cancelled`, or when moving a
/// paid sale back to `Pending`.
pub fn transition(sale: &Sale, target: SaleStatus) -> CoreResult<Money> {
    let balance = sale.balance_remaining();

    match (sale.status, target) {
        (SaleStatus::Pending, SaleStatus::Pending) | (SaleStatus::Paid, SaleStatus::Paid) => {
            Ok(balance)
        }
        (_, SaleStatus::Cancelled) => Ok(balance),
        (SaleStatus::Pending, SaleStatus::Paid) => Ok(Money::zero()),
        (SaleStatus::Cancelled, _) => Err(invalid(sale, "a cancelled sale cannot be reopened")),
        (SaleStatus::Paid, SaleStatus::Pending) => Err(invalid(
            sale,
            "a paid sale cannot go back to pending",
        )),
    }
}

/// Applies field changes to a copy of `sale`, enforcing immutability of the
/// total and the status rules above.
///
/// Text fields are expected to be validated by the caller.
pub fn apply_changes(sale: &Sale, changes: &SaleChanges) -> CoreResult<Sale> {
    if let Some(total) = changes.total {
        if total != sale.total() {
            return Err(CoreError::ImmutableField {
                field: "valor".to_string(),
            });
        }
    }

    let mut updated = sale.clone();

    if let Some(target) = changes.status {
        updated.balance_remaining_cents = transition(sale, target)?.cents();
        updated.status = target;
    }
    if let Some(seller) = &changes.seller {
        updated.seller = seller.clone();
    }
    if let Some(customer) = &changes.customer {
        updated.customer = customer.clone();
    }
    if let Some(description) = &changes.description {
        updated.description = description.clone();
    }
    if let Some(product) = &changes.product {
        updated.product = product.clone();
    }

    Ok(updated)
}

fn invalid(sale: &Sale, reason: &str) -> CoreError {
    CoreError::InvalidState {
        sale_id: sale.id.clone(),
        current: sale.status,
        reason: reason.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewSale;
    use chrono::Utc;

    fn sale_with(status: SaleStatus, balance: i64) -> Sale {
        let mut sale = NewSale::new("Ivan", None, Money::from_cents(10_000), SaleStatus::Pending)
            .unwrap()
            .into_sale("venta-1", Utc::now());
        sale.status = status;
        sale.balance_remaining_cents = balance;
        sale
    }

    #[test]
    fn test_cancel_freezes_balance() {
        let sale = sale_with(SaleStatus::Pending, 4_000);
        assert_eq!(transition(&sale, SaleStatus::Cancelled).unwrap().cents(), 4_000);

        let paid = sale_with(SaleStatus::Paid, 0);
        assert!(transition(&paid, SaleStatus::Cancelled).unwrap().is_zero());
    }

    #[test]
    fn test_manual_settlement() {
        let sale = sale_with(SaleStatus::Pending, 4_000);
        assert!(transition(&sale, SaleStatus::Paid).unwrap().is_zero());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let sale = sale_with(SaleStatus::Cancelled, 4_000);
        assert!(transition(&sale, SaleStatus::Pending).is_err());
        assert!(transition(&sale, SaleStatus::Paid).is_err());
        assert!(transition(&sale, SaleStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_paid_cannot_reopen() {
        let sale = sale_with(SaleStatus::Paid, 0);
        assert!(matches!(
            transition(&sale, SaleStatus::Pending),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_apply_changes_rejects_new_total() {
        let sale = sale_with(SaleStatus::Pending, 10_000);
        let changes = SaleChanges {
            total: Some(Money::from_cents(12_000)),
            ..Default::default()
        };
        assert!(matches!(
            apply_changes(&sale, &changes),
            Err(CoreError::ImmutableField { .. })
        ));

        let same_total = SaleChanges {
            total: Some(Money::from_cents(10_000)),
            ..Default::default()
        };
        assert!(apply_changes(&sale, &same_total).is_ok());
    }

    #[test]
    fn test_apply_changes_updates_fields() {
        let mut sale = sale_with(SaleStatus::Pending, 10_000);
        sale.description = Some("2 x Producto A".to_string());

        let changes = SaleChanges {
            customer: Some("Marta".to_string()),
            description: Some(None),
            status: Some(SaleStatus::Cancelled),
            ..Default::default()
        };
        let updated = apply_changes(&sale, &changes).unwrap();

        assert_eq!(updated.customer, "Marta");
        assert_eq!(updated.description, None);
        assert_eq!(updated.status, SaleStatus::Cancelled);
        assert_eq!(updated.balance_remaining_cents, 10_000);
        assert_eq!(updated.seller, "Ivan");
    }
}
