//! Trainer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::trainer;
use crate::services::allocator;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Trainer, TrainerCreate, TrainerUpdate};
use shared::types::ScheduleSlot;

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct AvailableQuery {
    pub gym_id: i64,
    pub slot: ScheduleSlot,
}

/// GET /api/trainers - 获取所有教练
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Trainer>>>> {
    let trainers = trainer::find_all(&state.pool, query.gym_id).await?;
    Ok(ok(trainers))
}

/// GET /api/trainers/available?gym_id=&slot= - 指定排期模式下有空档的教练
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailableQuery>,
) -> AppResult<Json<AppResponse<Vec<Trainer>>>> {
    let trainers = allocator::find_available(&state.pool, query.gym_id, query.slot).await?;
    Ok(ok(trainers))
}

/// GET /api/trainers/:id - 获取单个教练
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Trainer>>> {
    let trainer = trainer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Trainer {id}")))?;
    Ok(ok(trainer))
}

/// POST /api/trainers - 创建教练
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TrainerCreate>,
) -> AppResult<Json<AppResponse<Trainer>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if let Some(salary) = payload.salary {
        validate_amount(salary, "salary")?;
    }
    let trainer = trainer::create(&state.pool, payload).await?;
    Ok(ok(trainer))
}

/// PUT /api/trainers/:id - 更新教练
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TrainerUpdate>,
) -> AppResult<Json<AppResponse<Trainer>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if let Some(salary) = payload.salary {
        validate_amount(salary, "salary")?;
    }
    let trainer = trainer::update(&state.pool, id, payload).await?;
    Ok(ok(trainer))
}

/// DELETE /api/trainers/:id - 删除教练（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let removed = trainer::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Trainer {id}")));
    }
    Ok(ok(true))
}
