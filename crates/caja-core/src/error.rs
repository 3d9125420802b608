//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                          │
//! │  ├── CoreError        - Payment and lifecycle rule violations          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  caja-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - What the client sees (JSON)                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::SaleStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is raised before any state is written, so a caller that
/// receives one can assume the sale is unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Payment amount is not a positive, finite amount of at least one cent.
    #[error("Invalid payment amount: {reason}")]
    InvalidAmount { reason: String },

    /// Sale is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Paying a cancelled sale
    /// - Moving a cancelled sale back to pending or paid
    /// - Moving a paid sale back to pending
    #[error("Sale {sale_id} is {current}: {reason}")]
    InvalidState {
        sale_id: String,
        current: SaleStatus,
        reason: String,
    },

    /// A new sale was given a status it cannot start in.
    #[error("A sale cannot be created as {status}")]
    InvalidInitialStatus { status: SaleStatus },

    /// The outstanding balance is already within tolerance of zero.
    #[error("Sale {sale_id} is already fully paid")]
    AlreadySettled { sale_id: String },

    /// Attempt to change a field that is fixed at creation.
    #[error("{field} cannot be changed once the sale is created")]
    ImmutableField { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidAmount error.
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            reason: reason.into(),
        }
    }

    /// Creates an InvalidAmount error for a non-positive amount.
    pub(crate) fn non_positive(amount: Money) -> Self {
        CoreError::invalid_amount(format!("{} is not a positive amount", amount))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
