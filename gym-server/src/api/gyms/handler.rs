//! Gym API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::gym;
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Gym, GymCreate, GymUpdate};

/// GET /api/gyms - 获取所有场馆
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Gym>>>> {
    let gyms = gym::find_all(&state.pool).await?;
    Ok(ok(gyms))
}

/// GET /api/gyms/:id - 获取单个场馆
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Gym>>> {
    let gym = gym::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Gym {id}")))?;
    Ok(ok(gym))
}

/// POST /api/gyms - 创建场馆
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GymCreate>,
) -> AppResult<Json<AppResponse<Gym>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    let gym = gym::create(&state.pool, payload).await?;
    Ok(ok(gym))
}

/// PUT /api/gyms/:id - 更新场馆
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<GymUpdate>,
) -> AppResult<Json<AppResponse<Gym>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    let gym = gym::update(&state.pool, id, payload).await?;
    Ok(ok(gym))
}

/// DELETE /api/gyms/:id - 停用场馆
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let removed = gym::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Gym {id}")));
    }
    Ok(ok(true))
}
