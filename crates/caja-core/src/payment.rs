//! # Payment Application Engine
//!
//! Applies an incoming payment to a sale's outstanding balance and derives
//! the resulting status. Pure: the caller reads the sale, calls
//! [`apply_payment`], and persists the [`PaymentOutcome`] atomically.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_payment(sale, requested)                                         │
//! │                                                                         │
//! │  1. requested <= 0 ?                  ──► InvalidAmount                 │
//! │  2. sale.status == Cancelled ?        ──► InvalidState                  │
//! │  3. remaining = sale.balance_remaining                                  │
//! │     remaining <= ε (1 cent) ?         ──► AlreadySettled                │
//! │                                                                         │
//! │  4. applied  = min(requested, remaining)      (overpayment clamped)    │
//! │     balance' = remaining - applied                                      │
//! │                                                                         │
//! │  5. balance' <= ε ?                                                     │
//! │       yes ──► status = Paid,    balance' = 0  (exact settlement)       │
//! │       no  ──► status = Pending                                          │
//! │                                                                         │
//! │  Nothing is mutated on error: every check runs before any write.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use caja_core::{apply_payment, Money, NewSale, SaleStatus};
//!
//! let sale = NewSale::new("Ivan", None, Money::from_cents(20_000), SaleStatus::Pending)
//!     .unwrap()
//!     .into_sale("venta-1", chrono::Utc::now());
//!
//! // $250.00 against a $200.00 sale: clamped, no error
//! let outcome = apply_payment(&sale, Money::from_cents(25_000)).unwrap();
//! assert_eq!(outcome.applied.cents(), 20_000);
//! assert!(outcome.clamped);
//! assert_eq!(outcome.status, SaleStatus::Paid);
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Sale, SaleStatus};
use crate::SETTLEMENT_TOLERANCE;

/// The result of applying one payment to a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Amount credited to the sale (the requested amount, clamped).
    pub applied: Money,
    /// Outstanding balance after the payment.
    pub balance_remaining: Money,
    /// Status derived from the new balance.
    pub status: SaleStatus,
    /// Whether the requested amount exceeded the remaining balance.
    pub clamped: bool,
}

/// Applies a payment to a sale.
///
/// ## Errors
/// Checked in order, first failure wins:
/// - [`CoreError::InvalidAmount`] when `requested` is zero or negative
/// - [`CoreError::InvalidState`] when the sale is cancelled
/// - [`CoreError::AlreadySettled`] when the balance is within tolerance
pub fn apply_payment(sale: &Sale, requested: Money) -> CoreResult<PaymentOutcome> {
    if !requested.is_positive() {
        return Err(CoreError::non_positive(requested));
    }

    if sale.status == SaleStatus::Cancelled {
        return Err(CoreError::InvalidState {
            sale_id: sale.id.clone(),
            current: sale.status,
            reason: "payments are not allowed on a cancelled sale".to_string(),
        });
    }

    if sale.is_settled() {
        return Err(CoreError::AlreadySettled {
            sale_id: sale.id.clone(),
        });
    }

    let remaining = sale.balance_remaining();

    let applied = requested.min(remaining);
    let mut balance_remaining = remaining - applied;

    let status = if balance_remaining <= SETTLEMENT_TOLERANCE {
        balance_remaining = Money::zero();
        SaleStatus::Paid
    } else {
        SaleStatus::Pending
    };

    Ok(PaymentOutcome {
        applied,
        balance_remaining,
        status,
        clamped: requested > remaining,
    })
}

/// Derives the opening balance of a sale from its initial status.
///
/// - `Paid`: settled at creation, balance 0 (no payment history entry)
/// - `Pending`: nothing paid yet, balance = total. A total already within
///   tolerance is settled on arrival and opens as `Paid`.
/// - `Cancelled`: not a valid initial state
///
/// ## Errors
/// - [`CoreError::InvalidAmount`] when `total` is not positive
/// - [`CoreError::InvalidInitialStatus`] for an initial `Cancelled` status
pub fn opening_balance(status: SaleStatus, total: Money) -> CoreResult<(SaleStatus, Money)> {
    if !total.is_positive() {
        return Err(CoreError::invalid_amount(format!(
            "sale total {} is not a positive amount",
            total
        )));
    }

    match status {
        SaleStatus::Paid => Ok((SaleStatus::Paid, Money::zero())),
        SaleStatus::Pending if total <= SETTLEMENT_TOLERANCE => {
            Ok((SaleStatus::Paid, Money::zero()))
        }
        SaleStatus::Pending => Ok((SaleStatus::Pending, total)),
        SaleStatus::Cancelled => Err(CoreError::InvalidInitialStatus { status }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewSale, SalePayment};
    use chrono::Utc;

    fn pending_sale(total_cents: i64) -> Sale {
        NewSale::new(
            "Ivan",
            None,
            Money::from_cents(total_cents),
            SaleStatus::Pending,
        )
        .unwrap()
        .into_sale("venta-1", Utc::now())
    }

    /// Mirrors what the store does with an outcome.
    fn commit(sale: &mut Sale, outcome: PaymentOutcome) {
        sale.balance_remaining_cents = outcome.balance_remaining.cents();
        sale.status = outcome.status;
        sale.payments.push(SalePayment {
            id: format!("p-{}", sale.payments.len()),
            sale_id: sale.id.clone(),
            amount_cents: outcome.applied.cents(),
            paid_at: Utc::now(),
        });
    }

    #[test]
    fn test_partial_payment_stays_pending() {
        let sale = pending_sale(10_000);
        let outcome = apply_payment(&sale, Money::from_cents(3_000)).unwrap();

        assert_eq!(outcome.applied.cents(), 3_000);
        assert_eq!(outcome.balance_remaining.cents(), 7_000);
        assert_eq!(outcome.status, SaleStatus::Pending);
        assert!(!outcome.clamped);
    }

    #[test]
    fn test_two_payments_settle_sale() {
        let mut sale = pending_sale(10_000);

        let first = apply_payment(&sale, Money::from_cents(3_000)).unwrap();
        commit(&mut sale, first);
        let second = apply_payment(&sale, Money::from_cents(7_000)).unwrap();
        commit(&mut sale, second);

        assert_eq!(sale.amount_paid().cents(), 10_000);
        assert_eq!(sale.status, SaleStatus::Paid);
        assert_eq!(sale.payments.len(), 2);
        assert_eq!(sale.history_total(), sale.amount_paid());
    }

    #[test]
    fn test_overpayment_is_clamped_to_remaining() {
        let sale = pending_sale(20_000);
        let outcome = apply_payment(&sale, Money::from_cents(25_000)).unwrap();

        assert_eq!(outcome.applied.cents(), 20_000);
        assert_eq!(outcome.balance_remaining, Money::zero());
        assert_eq!(outcome.status, SaleStatus::Paid);
        assert!(outcome.clamped);
    }

    #[test]
    fn test_overpayment_after_partial_payment() {
        let mut sale = pending_sale(10_000);
        let first = apply_payment(&sale, Money::from_cents(6_000)).unwrap();
        commit(&mut sale, first);

        let outcome = apply_payment(&sale, Money::from_cents(9_999)).unwrap();
        assert_eq!(outcome.applied.cents(), 4_000);
        assert_eq!(outcome.status, SaleStatus::Paid);
    }

    #[test]
    fn test_payment_within_tolerance_settles_exactly() {
        let sale = pending_sale(10_000);
        // Leaves one cent outstanding, which counts as settled
        let outcome = apply_payment(&sale, Money::from_cents(9_999)).unwrap();

        assert_eq!(outcome.applied.cents(), 9_999);
        assert_eq!(outcome.balance_remaining, Money::zero());
        assert_eq!(outcome.status, SaleStatus::Paid);
    }

    #[test]
    fn test_two_cents_outstanding_is_pending() {
        let sale = pending_sale(10_000);
        let outcome = apply_payment(&sale, Money::from_cents(9_998)).unwrap();

        assert_eq!(outcome.balance_remaining.cents(), 2);
        assert_eq!(outcome.status, SaleStatus::Pending);
    }

    #[test]
    fn test_paid_sale_rejects_payment() {
        let mut sale = pending_sale(5_000);
        sale.balance_remaining_cents = 0;
        sale.status = SaleStatus::Paid;

        let err = apply_payment(&sale, Money::from_cents(100)).unwrap_err();
        assert!(matches!(err, CoreError::AlreadySettled { .. }));
    }

    #[test]
    fn test_one_cent_outstanding_counts_as_settled() {
        let mut sale = pending_sale(5_000);
        sale.balance_remaining_cents = 1;

        let err = apply_payment(&sale, Money::from_cents(1)).unwrap_err();
        assert!(matches!(err, CoreError::AlreadySettled { .. }));
    }

    #[test]
    fn test_cancelled_sale_rejects_payment() {
        let mut sale = pending_sale(5_000);
        sale.status = SaleStatus::Cancelled;

        let err = apply_payment(&sale, Money::from_cents(100)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidState {
                current: SaleStatus::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn test_cancelled_and_settled_reports_cancelled() {
        let mut sale = pending_sale(5_000);
        sale.balance_remaining_cents = 0;
        sale.status = SaleStatus::Cancelled;

        let err = apply_payment(&sale, Money::from_cents(100)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
    }

    #[test]
    fn test_non_positive_amount_is_rejected_first() {
        let mut sale = pending_sale(5_000);
        sale.status = SaleStatus::Cancelled;

        for cents in [0, -1, -10_000] {
            let err = apply_payment(&sale, Money::from_cents(cents)).unwrap_err();
            assert!(matches!(err, CoreError::InvalidAmount { .. }));
        }
    }

    #[test]
    fn test_payments_summing_below_total_stay_pending() {
        let mut sale = pending_sale(10_000);
        for cents in [1_000, 2_550, 3_333, 17] {
            let outcome = apply_payment(&sale, Money::from_cents(cents)).unwrap();
            commit(&mut sale, outcome);
        }

        assert_eq!(sale.amount_paid().cents(), 6_900);
        assert_eq!(sale.status, SaleStatus::Pending);
        assert_eq!(sale.history_total(), sale.amount_paid());
    }

    #[test]
    fn test_opening_balance() {
        let total = Money::from_cents(5_000);

        assert_eq!(
            opening_balance(SaleStatus::Paid, total).unwrap(),
            (SaleStatus::Paid, Money::zero())
        );
        assert_eq!(
            opening_balance(SaleStatus::Pending, total).unwrap(),
            (SaleStatus::Pending, total)
        );
        assert!(matches!(
            opening_balance(SaleStatus::Cancelled, total),
            Err(CoreError::InvalidInitialStatus {
                status: SaleStatus::Cancelled
            })
        ));
        assert!(matches!(
            opening_balance(SaleStatus::Pending, Money::zero()),
            Err(CoreError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_one_cent_pending_sale_opens_settled() {
        let sale = pending_sale(1);

        assert_eq!(sale.status, SaleStatus::Paid);
        assert_eq!(sale.balance_remaining(), Money::zero());
        assert_eq!(sale.amount_paid().cents(), 1);
        assert!(sale.is_settled());

        let err = apply_payment(&sale, Money::from_cents(1)).unwrap_err();
        assert!(matches!(err, CoreError::AlreadySettled { .. }));
    }

    #[test]
    fn test_two_cent_pending_sale_takes_payments() {
        let sale = pending_sale(2);
        assert_eq!(sale.status, SaleStatus::Pending);

        let outcome = apply_payment(&sale, Money::from_cents(1)).unwrap();
        assert_eq!(outcome.status, SaleStatus::Paid);
        assert_eq!(outcome.balance_remaining, Money::zero());
    }
}
