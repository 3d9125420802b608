//! # caja-db: Database Layer for Caja
//!
//! This crate is the ledger store. It uses SQLite for storage with sqlx for
//! async operations, and owns the guarded update that applies payments.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Caja Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (PUT /api/ventas/{id}/pago)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     caja-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ SaleRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ WithdrawalRepo│    │ 001_initial  │  │   │
//! │  │   │ Lifecycle     │    │ Group/Member  │    │ _schema.sql  │  │   │
//! │  │   │               │    │ Maintenance   │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ caja_core::apply_payment      │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │       │                           ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (caja.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per collection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caja_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("caja.db")).await?;
//!
//! let sale = db.sales().create(new_sale).await?;
//! let (sale, outcome) = db.sales().apply_payment(&sale.id, Money::from_cents(3_000)).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::group::GroupRepository;
pub use repository::maintenance::{MaintenanceRepository, WipeSummary};
pub use repository::member::MemberRepository;
pub use repository::sale::{SaleRepository, MAX_CAS_ATTEMPTS};
pub use repository::withdrawal::WithdrawalRepository;
