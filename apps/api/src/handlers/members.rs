//! # Member Handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use caja_core::validation::{validate_name, validate_required_text};

use crate::dto::{CreateMemberRequest, MemberDto, MemberFilter};
use crate::error::ApiResult;
use crate::AppState;

/// Adds a member. 404 when `grupoId` names no group.
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MemberDto>)> {
    let Json(request) = payload?;
    let name = validate_name("nombre", &request.name)?;
    let group_id = validate_required_text("grupoId", &request.group_id)?;

    let member = state.db.members().create(name, &group_id).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MemberFilter>,
) -> ApiResult<Json<Vec<MemberDto>>> {
    let group_id = filter
        .group_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let members = state.db.members().list(group_id).await?;
    Ok(Json(members.into_iter().map(MemberDto::from).collect()))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.members().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
