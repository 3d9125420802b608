//! # Withdrawal Handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{CreateWithdrawalRequest, WithdrawalDto};
use crate::error::ApiResult;
use crate::AppState;

pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateWithdrawalRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WithdrawalDto>)> {
    let Json(request) = payload?;
    let (amount, description) = request.validate()?;

    let withdrawal = state.db.withdrawals().create(amount, description).await?;
    Ok((StatusCode::CREATED, Json(withdrawal.into())))
}

pub async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WithdrawalDto>>> {
    let withdrawals = state.db.withdrawals().list().await?;
    Ok(Json(withdrawals.into_iter().map(WithdrawalDto::from).collect()))
}

pub async fn delete_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.withdrawals().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
