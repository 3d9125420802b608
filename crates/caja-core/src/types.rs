//! # Domain Types
//!
//! Core domain types used throughout Caja.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │   SalePayment   │   │   Withdrawal    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  sale_id (FK)   │   │  id (UUID)      │       │
//! │  │  seller         │   │  amount_cents   │   │  amount_cents   │       │
//! │  │  total_cents    │   │  paid_at        │   │  description    │       │
//! │  │  balance_cents  │   └─────────────────┘   └─────────────────┘       │
//! │  │  status         │                                                    │
//! │  │  payments[]     │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │      Group      │◄──│     Member      │       │
//! │                        │  name (unique)  │   │  group_id (FK)  │       │
//! │  ┌─────────────────┐   └─────────────────┘   └─────────────────┘       │
//! │  │   SaleStatus    │                                                    │
//! │  │  Paid           │                                                    │
//! │  │  Pending        │                                                    │
//! │  │  Cancelled      │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Balance Representation
//! A sale stores its **remaining balance**. The amount paid so far is always
//! derived as `total - balance_remaining`, so the two can never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::payment::opening_balance;
use crate::SETTLEMENT_TOLERANCE;

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
///
/// Serialized with the values the ledger's clients have always used
/// (`"Pagado"`, `"Pendiente"`, `"Cancelado"`); stored lowercase in English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum SaleStatus {
    /// Balance is settled (within tolerance).
    #[serde(rename = "Pagado")]
    Paid,
    /// Balance is still outstanding.
    #[serde(rename = "Pendiente")]
    Pending,
    /// Sale was cancelled; the balance is frozen.
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl SaleStatus {
    /// All statuses with their wire names, for validation messages.
    pub const WIRE_NAMES: [&'static str; 3] = ["Pagado", "Pendiente", "Cancelado"];

    /// The name clients see for this status.
    pub fn wire_name(self) -> &'static str {
        match self {
            SaleStatus::Paid => "Pagado",
            SaleStatus::Pending => "Pendiente",
            SaleStatus::Cancelled => "Cancelado",
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale tracked until its total has been paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,
    /// Who made the sale.
    pub seller: String,
    pub customer: String,
    /// Agreed total in cents. Fixed at creation.
    pub total_cents: i64,
    /// Outstanding balance in cents.
    pub balance_remaining_cents: i64,
    pub status: SaleStatus,
    pub description: Option<String>,
    pub product: Option<String>,
    /// Payments applied to this sale, oldest first.
    pub payments: Vec<SalePayment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Incremented on every mutation; guards conditional updates.
    pub version: i64,
}

impl Sale {
    /// Returns the agreed total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the outstanding balance as Money.
    #[inline]
    pub fn balance_remaining(&self) -> Money {
        Money::from_cents(self.balance_remaining_cents)
    }

    /// Returns the amount paid so far (`total - balance_remaining`).
    #[inline]
    pub fn amount_paid(&self) -> Money {
        self.total() - self.balance_remaining()
    }

    /// Checks whether the balance is within tolerance of zero.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.balance_remaining() <= SETTLEMENT_TOLERANCE
    }

    /// Sum of every recorded payment.
    pub fn history_total(&self) -> Money {
        self.payments
            .iter()
            .fold(Money::zero(), |acc, p| acc + p.amount())
    }
}

// =============================================================================
// New Sale
// =============================================================================

/// A validated sale that has not been stored yet.
///
/// ## Example
/// ```rust
/// use caja_core::{Money, NewSale, SaleStatus};
///
/// let sale = NewSale::new("Ivan", None, Money::from_cents(5_000), SaleStatus::Paid)
///     .unwrap()
///     .with_product(Some("Producto A".to_string()));
///
/// assert_eq!(sale.customer, "Anónimo");
/// assert!(sale.balance_remaining.is_zero());
/// ```
#[derive(Debug, Clone)]
pub struct NewSale {
    pub seller: String,
    pub customer: String,
    pub total: Money,
    pub status: SaleStatus,
    pub balance_remaining: Money,
    pub description: Option<String>,
    pub product: Option<String>,
}

impl NewSale {
    /// Creates a new sale, deriving the opening balance from the status.
    ///
    /// A missing customer is recorded as [`crate::DEFAULT_CUSTOMER`].
    pub fn new(
        seller: impl Into<String>,
        customer: Option<String>,
        total: Money,
        status: SaleStatus,
    ) -> CoreResult<Self> {
        let (status, balance_remaining) = opening_balance(status, total)?;

        Ok(NewSale {
            seller: seller.into(),
            customer: customer.unwrap_or_else(|| crate::DEFAULT_CUSTOMER.to_string()),
            total,
            status,
            balance_remaining,
            description: None,
            product: None,
        })
    }

    /// Sets the free-text description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the product label.
    pub fn with_product(mut self, product: Option<String>) -> Self {
        self.product = product;
        self
    }

    /// Materializes the sale with the identity assigned by the store.
    pub fn into_sale(self, id: impl Into<String>, now: DateTime<Utc>) -> Sale {
        Sale {
            id: id.into(),
            seller: self.seller,
            customer: self.customer,
            total_cents: self.total.cents(),
            balance_remaining_cents: self.balance_remaining.cents(),
            status: self.status,
            description: self.description,
            product: self.product,
            payments: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }
}

// =============================================================================
// Sale Payment
// =============================================================================

/// One payment applied to a sale. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalePayment {
    pub id: String,
    pub sale_id: String,
    /// Amount actually applied (after clamping), in cents.
    pub amount_cents: i64,
    pub paid_at: DateTime<Utc>,
}

impl SalePayment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Sale Update
// =============================================================================

/// Field changes requested through a generic sale update.
///
/// `None` leaves the field untouched. For the optional text fields,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct SaleChanges {
    pub seller: Option<String>,
    pub customer: Option<String>,
    pub description: Option<Option<String>>,
    pub product: Option<Option<String>>,
    pub status: Option<SaleStatus>,
    /// Total sent by the client; must match the stored total.
    pub total: Option<Money>,
}

impl SaleChanges {
    /// Checks if no field would change.
    pub fn is_empty(&self) -> bool {
        self.seller.is_none()
            && self.customer.is_none()
            && self.description.is_none()
            && self.product.is_none()
            && self.status.is_none()
            && self.total.is_none()
    }
}

// =============================================================================
// Withdrawal
// =============================================================================

/// Cash taken out of the till. No lifecycle beyond create/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Withdrawal {
    pub id: String,
    pub amount_cents: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Withdrawal {
    /// Returns the withdrawn amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Group / Member
// =============================================================================

/// A named group of sellers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A seller ("integrante") belonging to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Member {
    pub id: String,
    pub name: String,
    pub group_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(total: i64, balance: i64, status: SaleStatus) -> Sale {
        let mut sale = NewSale::new("Ivan", None, Money::from_cents(total), SaleStatus::Pending)
            .unwrap()
            .into_sale("s-1", Utc::now());
        sale.balance_remaining_cents = balance;
        sale.status = status;
        sale
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Pending);
    }

    #[test]
    fn test_sale_status_wire_names() {
        assert_eq!(serde_json::to_string(&SaleStatus::Paid).unwrap(), "\"Pagado\"");
        assert_eq!(
            serde_json::from_str::<SaleStatus>("\"Cancelado\"").unwrap(),
            SaleStatus::Cancelled
        );
        assert!(serde_json::from_str::<SaleStatus>("\"paid\"").is_err());
    }

    #[test]
    fn test_amount_paid_is_derived() {
        let sale = sale(10_000, 2_500, SaleStatus::Pending);
        assert_eq!(sale.amount_paid().cents(), 7_500);
        assert!(!sale.is_settled());
    }

    #[test]
    fn test_is_settled_within_tolerance() {
        assert!(sale(10_000, 1, SaleStatus::Pending).is_settled());
        assert!(sale(10_000, 0, SaleStatus::Paid).is_settled());
        assert!(!sale(10_000, 2, SaleStatus::Pending).is_settled());
    }

    #[test]
    fn test_new_sale_defaults_customer() {
        let new = NewSale::new("Ivan", None, Money::from_cents(100), SaleStatus::Pending).unwrap();
        assert_eq!(new.customer, crate::DEFAULT_CUSTOMER);
        assert_eq!(new.balance_remaining.cents(), 100);

        let stored = new.into_sale("abc", Utc::now());
        assert_eq!(stored.id, "abc");
        assert!(stored.payments.is_empty());
        assert_eq!(stored.version, 0);
    }

    #[test]
    fn test_sale_changes_is_empty() {
        assert!(SaleChanges::default().is_empty());
        let changes = SaleChanges {
            description: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
