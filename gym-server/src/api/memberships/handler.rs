//! Membership API Handlers
//!
//! 套餐模板：价格、时长、是否需要私教及其排期模式。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{membership, trainer};
use crate::utils::validation::{MAX_NAME_LEN, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Membership, MembershipCreate, MembershipUpdate};

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
}

/// GET /api/memberships - 获取所有套餐
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Membership>>>> {
    let plans = membership::find_all(&state.pool, query.gym_id).await?;
    Ok(ok(plans))
}

/// GET /api/memberships/:id - 获取单个套餐
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Membership>>> {
    let plan = membership::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Membership {id}")))?;
    Ok(ok(plan))
}

/// POST /api/memberships - 创建套餐
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MembershipCreate>,
) -> AppResult<Json<AppResponse<Membership>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_amount(payload.price, "price")?;
    if payload.duration_months <= 0 {
        return Err(AppError::validation("duration_months must be positive"));
    }
    if let Some(preset) = payload.preset_trainer_id {
        trainer::find_by_id(&state.pool, preset)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trainer {preset}")))?;
    }
    let plan = membership::create(&state.pool, payload).await?;
    Ok(ok(plan))
}

/// PUT /api/memberships/:id - 更新套餐
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MembershipUpdate>,
) -> AppResult<Json<AppResponse<Membership>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "price")?;
    }
    if let Some(duration) = payload.duration_months
        && duration <= 0
    {
        return Err(AppError::validation("duration_months must be positive"));
    }
    let plan = membership::update(&state.pool, id, payload).await?;
    Ok(ok(plan))
}

/// DELETE /api/memberships/:id - 下架套餐
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let removed = membership::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Membership {id}")));
    }
    Ok(ok(true))
}
