//! # Wire Types
//!
//! Request and response bodies, with the field names the ledger's clients
//! use (`nombre`, `valor`, `montoPagado`, ...). Money crosses the wire as a
//! decimal number and is converted to cents here, at the boundary.

use caja_core::validation::{
    parse_amount, parse_status, validate_name, validate_optional_text, validate_required_text,
};
use caja_core::{
    CoreError, DEFAULT_CUSTOMER, Group, Member, Money, NewSale, Sale, SaleChanges, SalePayment, SaleStatus,
    ValidationError, Withdrawal,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Sales
// =============================================================================

/// A sale as returned by every `/api/ventas` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDto {
    pub id: String,
    #[serde(rename = "nombre")]
    pub seller: String,
    #[serde(rename = "cliente")]
    pub customer: String,
    #[serde(rename = "valor")]
    pub total: f64,
    #[serde(rename = "estado")]
    pub status: SaleStatus,
    #[serde(rename = "montoPagado")]
    pub amount_paid: f64,
    #[serde(rename = "saldoPendiente")]
    pub balance_remaining: f64,
    #[serde(rename = "historialPagos")]
    pub payment_history: Vec<PaymentDto>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "producto")]
    pub product: Option<String>,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            total: sale.total().to_decimal(),
            amount_paid: sale.amount_paid().to_decimal(),
            balance_remaining: sale.balance_remaining().to_decimal(),
            payment_history: sale.payments.into_iter().map(PaymentDto::from).collect(),
            id: sale.id,
            seller: sale.seller,
            customer: sale.customer,
            status: sale.status,
            description: sale.description,
            product: sale.product,
            created_at: sale.created_at,
        }
    }
}

/// One entry of a sale's payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDto {
    pub id: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "fecha")]
    pub paid_at: DateTime<Utc>,
}

impl From<SalePayment> for PaymentDto {
    fn from(payment: SalePayment) -> Self {
        PaymentDto {
            amount: payment.amount().to_decimal(),
            id: payment.id,
            paid_at: payment.paid_at,
        }
    }
}

/// Body of `POST /api/ventas`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(rename = "nombre")]
    pub seller: String,
    #[serde(rename = "cliente", default)]
    pub customer: Option<String>,
    #[serde(rename = "valor")]
    pub total: f64,
    /// Defaults to `Pendiente`.
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "producto", default)]
    pub product: Option<String>,
}

impl CreateSaleRequest {
    /// Validates the body and derives the opening balance.
    pub fn into_new_sale(self) -> Result<NewSale, CoreError> {
        let seller = validate_name("nombre", &self.seller)?;
        let customer = self
            .customer
            .map(|c| customer_or_default(&c))
            .transpose()?;
        let total = parse_amount("valor", self.total)?;
        let status = match self.status {
            Some(status) => parse_status(&status)?,
            None => SaleStatus::default(),
        };

        Ok(NewSale::new(seller, customer, total, status)?
            .with_description(validate_optional_text("descripcion", self.description)?)
            .with_product(validate_optional_text("producto", self.product)?))
    }
}

/// A blank customer falls back to [`DEFAULT_CUSTOMER`] on create and update.
fn customer_or_default(customer: &str) -> Result<String, ValidationError> {
    if customer.trim().is_empty() {
        return Ok(DEFAULT_CUSTOMER.to_string());
    }
    validate_name("cliente", customer)
}

/// Body of `PUT /api/ventas/{id}`. Absent fields are left untouched; an
/// empty `descripcion` or `producto` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSaleRequest {
    #[serde(rename = "nombre", default)]
    pub seller: Option<String>,
    #[serde(rename = "cliente", default)]
    pub customer: Option<String>,
    #[serde(rename = "valor", default)]
    pub total: Option<f64>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "producto", default)]
    pub product: Option<String>,
}

impl UpdateSaleRequest {
    /// Validates the body into a set of changes.
    pub fn into_changes(self) -> Result<SaleChanges, ValidationError> {
        Ok(SaleChanges {
            seller: self
                .seller
                .map(|s| validate_name("nombre", &s))
                .transpose()?,
            customer: self.customer.map(|c| customer_or_default(&c)).transpose()?,
            description: self
                .description
                .map(|d| validate_optional_text("descripcion", Some(d)))
                .transpose()?,
            product: self
                .product
                .map(|p| validate_optional_text("producto", Some(p)))
                .transpose()?,
            status: self.status.map(|s| parse_status(&s)).transpose()?,
            total: self.total.map(|v| parse_amount("valor", v)).transpose()?,
        })
    }
}

/// Body of `PUT /api/ventas/{id}/pago`.
///
/// `monto` is kept as raw JSON so that a string, `null` or a missing field
/// is reported as an invalid amount rather than a malformed body.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub monto: serde_json::Value,
}

impl PaymentRequest {
    /// Returns the requested amount in cents.
    pub fn amount(&self) -> Result<Money, ValidationError> {
        let value = self
            .monto
            .as_f64()
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "monto".to_string(),
                reason: "must be a number".to_string(),
            })?;
        parse_amount("monto", value)
    }
}

// =============================================================================
// Withdrawals
// =============================================================================

/// A withdrawal as returned by `/api/retiros`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalDto {
    pub id: String,
    #[serde(rename = "cantidad")]
    pub amount: f64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

impl From<Withdrawal> for WithdrawalDto {
    fn from(withdrawal: Withdrawal) -> Self {
        WithdrawalDto {
            amount: withdrawal.amount().to_decimal(),
            id: withdrawal.id,
            description: withdrawal.description,
            created_at: withdrawal.created_at,
        }
    }
}

/// Body of `POST /api/retiros`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWithdrawalRequest {
    #[serde(rename = "cantidad")]
    pub amount: f64,
    #[serde(rename = "descripcion")]
    pub description: String,
}

impl CreateWithdrawalRequest {
    /// Validates the body.
    pub fn validate(self) -> Result<(Money, String), ValidationError> {
        let amount = parse_amount("cantidad", self.amount)?;
        let description = validate_required_text("descripcion", &self.description)?;
        Ok((amount, description))
    }
}

// =============================================================================
// Groups / Members
// =============================================================================

/// A group as returned by `/api/grupos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        GroupDto {
            id: group.id,
            name: group.name,
            created_at: group.created_at,
        }
    }
}

/// Body of `POST /api/grupos`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A member as returned by `/api/integrantes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "grupoId")]
    pub group_id: String,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        MemberDto {
            id: member.id,
            name: member.name,
            group_id: member.group_id,
            created_at: member.created_at,
        }
    }
}

/// Body of `POST /api/integrantes`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "grupoId")]
    pub group_id: String,
}

/// Query string of `GET /api/integrantes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberFilter {
    #[serde(rename = "grupoId")]
    pub group_id: Option<String>,
}
