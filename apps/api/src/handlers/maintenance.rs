//! # Maintenance Handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use crate::error::ApiResult;
use crate::AppState;

/// Deletes every sale, payment, withdrawal, group and member.
pub async fn wipe_all(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    let summary = state.db.maintenance().wipe_all().await?;
    info!(rows = summary.total(), "Data wipe requested over HTTP");
    Ok(StatusCode::NO_CONTENT)
}
