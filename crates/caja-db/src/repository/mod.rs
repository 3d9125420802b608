//! # Repository Module
//!
//! Database repository implementations for Caja.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().apply_payment(&id, amount)                         │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create / get_by_id / list / delete                                │
//! │  ├── apply_payment  ──► caja_core::apply_payment  (pure engine)        │
//! │  └── update         ──► caja_core::status::apply_changes               │
//! │       │                                                                 │
//! │       │  Guarded UPDATE ... WHERE id = ? AND version = ?               │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`](sale::SaleRepository) - Sales, payment history, payment application
//! - [`WithdrawalRepository`](withdrawal::WithdrawalRepository) - Cash withdrawals
//! - [`GroupRepository`](group::GroupRepository) - Seller groups
//! - [`MemberRepository`](member::MemberRepository) - Group members
//! - [`MaintenanceRepository`](maintenance::MaintenanceRepository) - Bulk wipe

pub mod group;
pub mod maintenance;
pub mod member;
pub mod sale;
pub mod withdrawal;
