//! # Group Handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use caja_core::validation::validate_name;

use crate::dto::{CreateGroupRequest, GroupDto};
use crate::error::ApiResult;
use crate::AppState;

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<GroupDto>)> {
    let Json(request) = payload?;
    let name = validate_name("nombre", &request.name)?;

    let group = state.db.groups().create(name).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

pub async fn list_groups(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<GroupDto>>> {
    let groups = state.db.groups().list().await?;
    Ok(Json(groups.into_iter().map(GroupDto::from).collect()))
}

/// Deletes a group. Fails with 409 while it still has members.
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.groups().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
