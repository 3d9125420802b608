//! # Router
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /health                           GET                                  │
//! │  /api/ventas                       GET  POST                            │
//! │  /api/ventas/{id}                  GET  PUT  DELETE                     │
//! │  /api/ventas/{id}/pago             PUT                                  │
//! │  /api/retiros                      GET  POST                            │
//! │  /api/retiros/{id}                 DELETE                               │
//! │  /api/grupos                       GET  POST                            │
//! │  /api/grupos/{id}                  DELETE                               │
//! │  /api/integrantes[?grupoId=]       GET  POST                            │
//! │  /api/integrantes/{id}             DELETE                               │
//! │  /api/datos-completos              DELETE                               │
//! │                                                                         │
//! │  Every request is traced (tower-http TraceLayer).                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{groups, health, maintenance, members, sales, withdrawals};
use crate::AppState;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Sales
        .route("/api/ventas", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/api/ventas/{id}",
            get(sales::get_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        )
        .route("/api/ventas/{id}/pago", put(sales::apply_payment))
        // Withdrawals
        .route(
            "/api/retiros",
            get(withdrawals::list_withdrawals).post(withdrawals::create_withdrawal),
        )
        .route("/api/retiros/{id}", delete(withdrawals::delete_withdrawal))
        // Groups & members
        .route("/api/grupos", get(groups::list_groups).post(groups::create_group))
        .route("/api/grupos/{id}", delete(groups::delete_group))
        .route(
            "/api/integrantes",
            get(members::list_members).post(members::create_member),
        )
        .route("/api/integrantes/{id}", delete(members::delete_member))
        // Maintenance
        .route("/api/datos-completos", delete(maintenance::wipe_all))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
