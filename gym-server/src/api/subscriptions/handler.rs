//! Subscription API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::subscription;
use crate::services::subscriptions;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Subscription, SubscriptionCreate, SubscriptionUpdate};

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
    pub member_id: Option<i64>,
}

/// Deletion result payload.
#[derive(Serialize)]
pub struct DeleteResult {
    pub deleted: bool,
    pub warnings: Vec<String>,
}

/// GET /api/subscriptions - 订阅列表（可按场馆/会员过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Subscription>>>> {
    let rows = subscription::find_all(&state.pool, query.gym_id, query.member_id).await?;
    Ok(ok(rows))
}

/// GET /api/subscriptions/:id - 获取单个订阅
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Subscription>>> {
    let row = subscription::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {id}")))?;
    Ok(ok(row))
}

/// POST /api/subscriptions - 注册订阅（必要时自动指派教练）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SubscriptionCreate>,
) -> AppResult<Json<AppResponse<subscriptions::SubscriptionOutcome>>> {
    let outcome = subscriptions::create(&state.pool, payload).await?;
    Ok(ok(outcome))
}

/// PUT /api/subscriptions/:id - 变更订阅（换套餐/续费/换教练/终止）
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SubscriptionUpdate>,
) -> AppResult<Json<AppResponse<subscriptions::SubscriptionOutcome>>> {
    let outcome = subscriptions::update(&state.pool, id, payload).await?;
    Ok(ok(outcome))
}

/// DELETE /api/subscriptions/:id - 删除订阅（级联取消课时、清理账本）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<DeleteResult>>> {
    let warnings = subscriptions::delete(&state.pool, id).await?;
    Ok(ok(DeleteResult {
        deleted: true,
        warnings,
    }))
}
