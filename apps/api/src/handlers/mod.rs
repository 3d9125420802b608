//! # HTTP Handlers
//!
//! One module per collection. Handlers stay thin: decode the body, validate
//! it into domain types, call the store, encode the result.
//!
//! - [`sales`] - `/api/ventas`, including payment application
//! - [`withdrawals`] - `/api/retiros`
//! - [`groups`] - `/api/grupos`
//! - [`members`] - `/api/integrantes`
//! - [`maintenance`] - `/api/datos-completos`
//! - [`health`] - `/health`

pub mod groups;
pub mod health;
pub mod maintenance;
pub mod members;
pub mod sales;
pub mod withdrawals;
