//! Equipment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::equipment;
use crate::utils::validation::{MAX_NAME_LEN, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Equipment, EquipmentCreate, EquipmentUpdate};

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
}

/// GET /api/equipment - 获取所有器材
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Equipment>>>> {
    let rows = equipment::find_all(&state.pool, query.gym_id).await?;
    Ok(ok(rows))
}

/// GET /api/equipment/:id - 获取单个器材
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Equipment>>> {
    let row = equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Equipment {id}")))?;
    Ok(ok(row))
}

/// POST /api/equipment - 创建器材
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EquipmentCreate>,
) -> AppResult<Json<AppResponse<Equipment>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(cost) = payload.purchase_cost {
        validate_amount(cost, "purchase_cost")?;
    }
    let row = equipment::create(&state.pool, payload).await?;
    Ok(ok(row))
}

/// PUT /api/equipment/:id - 更新器材
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EquipmentUpdate>,
) -> AppResult<Json<AppResponse<Equipment>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(cost) = payload.purchase_cost {
        validate_amount(cost, "purchase_cost")?;
    }
    let row = equipment::update(&state.pool, id, payload).await?;
    Ok(ok(row))
}

/// DELETE /api/equipment/:id - 退役器材
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let removed = equipment::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Equipment {id}")));
    }
    Ok(ok(true))
}
