//! # Sale Handlers
//!
//! ```text
//! POST   /api/ventas            create          201 | 400
//! GET    /api/ventas            list, newest    200
//! GET    /api/ventas/{id}       fetch one       200 | 404
//! PUT    /api/ventas/{id}       update fields   200 | 400 | 404 | 409
//! PUT    /api/ventas/{id}/pago  apply payment   200 | 400 | 404 | 409
//! DELETE /api/ventas/{id}       delete          204 | 404
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use crate::dto::{CreateSaleRequest, PaymentRequest, SaleDto, UpdateSaleRequest};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaleDto>)> {
    let Json(request) = payload?;
    let new_sale = request.into_new_sale()?;

    let sale = state.db.sales().create(new_sale).await?;
    Ok((StatusCode::CREATED, Json(sale.into())))
}

pub async fn list_sales(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SaleDto>>> {
    let sales = state.db.sales().list().await?;
    Ok(Json(sales.into_iter().map(SaleDto::from).collect()))
}

pub async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleDto>> {
    let sale = state
        .db
        .sales()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &id))?;
    Ok(Json(sale.into()))
}

pub async fn update_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSaleRequest>, JsonRejection>,
) -> ApiResult<Json<SaleDto>> {
    let Json(request) = payload?;
    let changes = request.into_changes()?;

    let sale = state.db.sales().update(&id, &changes).await?;
    Ok(Json(sale.into()))
}

/// Applies a payment. The amount is checked before the sale is looked up.
pub async fn apply_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> ApiResult<Json<SaleDto>> {
    let Json(request) = payload.map_err(|r| ApiError::invalid_amount(r.body_text()))?;
    let amount = request
        .amount()
        .map_err(|e| ApiError::invalid_amount(e.to_string()))?;

    debug!(id = %id, amount = %amount, "Payment requested");

    let (sale, _outcome) = state.db.sales().apply_payment(&id, amount).await?;
    Ok(Json(sale.into()))
}

pub async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.sales().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
