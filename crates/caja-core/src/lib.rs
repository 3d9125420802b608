//! # caja-core: Pure Business Logic for Caja
//!
//! This crate is the **heart** of Caja. It holds the rules that govern how a
//! sale's outstanding balance evolves as partial payments arrive, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Caja Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /api/ventas, /api/retiros, /api/grupos, /api/integrantes    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  payment  │  │ validation│  │   │
//! │  │   │   Sale    │  │   Money   │  │  engine   │  │   rules   │  │   │
//! │  │   │ Withdrawal│  │  (cents)  │  │  status   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-db (Database Layer)                     │   │
//! │  │       SQLite queries, migrations, atomic payment updates        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, SalePayment, Withdrawal, Group, Member)
//! - [`money`] - Money type with integer arithmetic
//! - [`payment`] - Payment application engine
//! - [`status`] - Status transitions requested through generic updates
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::money::Money;
//! use caja_core::payment::apply_payment;
//! use caja_core::types::{NewSale, SaleStatus};
//!
//! let sale = NewSale::new("Ivan", None, Money::from_cents(10_000), SaleStatus::Pending)
//!     .unwrap()
//!     .into_sale("venta-1", chrono::Utc::now());
//!
//! let outcome = apply_payment(&sale, Money::from_cents(3_000)).unwrap();
//! assert_eq!(outcome.balance_remaining.cents(), 7_000);
//! assert_eq!(outcome.status, SaleStatus::Pending);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payment;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{apply_payment, opening_balance, PaymentOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tolerance under which an outstanding balance counts as settled.
///
/// One cent: a sale whose remaining balance is at most this amount is
/// considered fully paid, and a payment that brings the balance within this
/// amount settles the sale exactly.
pub const SETTLEMENT_TOLERANCE: Money = Money::from_cents(1);

/// Customer recorded when a sale is created without one.
pub const DEFAULT_CUSTOMER: &str = "Anónimo";

/// Maximum length of names (seller, customer, group, member).
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of free-text fields (description, product).
pub const MAX_TEXT_LEN: usize = 500;
