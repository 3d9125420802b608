//! # caja-api: HTTP Surface for Caja
//!
//! axum server exposing sales, payments, withdrawals, groups and members as
//! JSON over HTTP.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PUT /api/ventas/{id}/pago  { "monto": 30 }                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes::router ── TraceLayer ──► handlers::sales::apply_payment        │
//! │       │                                                                 │
//! │       ├── dto::PaymentRequest::amount()   30.0 → Money(3000)           │
//! │       ├── state.db.sales().apply_payment(id, amount)                   │
//! │       │        └── caja_core::apply_payment + guarded UPDATE           │
//! │       └── dto::SaleDto                    200 + full sale record       │
//! │                                                                         │
//! │  Any failure ──► error::ApiError ──► status code + {code, message}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use caja_db::Database;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;

/// Shared application state.
///
/// Holds the store handle created at startup; handlers receive it as
/// `State<Arc<AppState>>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    /// Creates the state around an open database.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
