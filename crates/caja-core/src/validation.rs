//! # Validation Module
//!
//! Input validation utilities for Caja.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                      │
//! │  ├── JSON deserialization (types)                                      │
//! │  └── THIS MODULE: field rules, amount parsing                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain (payment / status)                                    │
//! │  └── Business rules (settled, cancelled, immutable total)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (group name)                                   │
//! │  └── Foreign key constraints (member → group)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::validation::{parse_amount, validate_name};
//!
//! let seller = validate_name("nombre", "  Ivan ").unwrap();
//! assert_eq!(seller, "Ivan");
//!
//! let amount = parse_amount("monto", 30.0).unwrap();
//! assert_eq!(amount.cents(), 3_000);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::SaleStatus;
use crate::{MAX_NAME_LEN, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name (seller, customer, group, member).
///
/// ## Rules
/// - Trimmed before checking
/// - Must not be empty
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a required free-text field (e.g. a withdrawal's description).
pub fn validate_required_text(field: &str, text: &str) -> ValidationResult<String> {
    validate_optional_text(field, Some(text.to_string()))?.ok_or_else(|| {
        ValidationError::Required {
            field: field.to_string(),
        }
    })
}

/// Validates an optional free-text field.
///
/// Blank text is normalized to `None`.
pub fn validate_optional_text(field: &str, text: Option<String>) -> ValidationResult<Option<String>> {
    let Some(text) = text else {
        return Ok(None);
    };

    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    if text.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(Some(text.to_string()))
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Converts a decimal amount from the wire into Money.
///
/// ## Rules
/// - Must be a finite number
/// - Must be greater than zero
/// - Must be at least one cent once rounded
///
/// ## Example
/// ```rust
/// use caja_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("monto", 0.01).unwrap().cents(), 1);
/// assert!(parse_amount("monto", 0.0).is_err());
/// assert!(parse_amount("monto", -5.0).is_err());
/// assert!(parse_amount("monto", 0.001).is_err());
/// assert!(parse_amount("monto", f64::NAN).is_err());
/// ```
pub fn parse_amount(field: &str, amount: f64) -> ValidationResult<Money> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    let money = Money::from_decimal(amount).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a finite amount".to_string(),
    })?;

    if !money.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(money)
}

// =============================================================================
// Enum Validators
// =============================================================================

/// Parses a sale status from its wire name.
///
/// ## Example
/// ```rust
/// use caja_core::validation::parse_status;
/// use caja_core::SaleStatus;
///
/// assert_eq!(parse_status("Pagado").unwrap(), SaleStatus::Paid);
/// assert!(parse_status("Vendido").is_err());
/// ```
pub fn parse_status(value: &str) -> ValidationResult<SaleStatus> {
    match value.trim() {
        "Pagado" => Ok(SaleStatus::Paid),
        "Pendiente" => Ok(SaleStatus::Pending),
        "Cancelado" => Ok(SaleStatus::Cancelled),
        _ => Err(ValidationError::NotAllowed {
            field: "estado".to_string(),
            allowed: SaleStatus::WIRE_NAMES.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
