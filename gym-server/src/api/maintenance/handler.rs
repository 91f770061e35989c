//! Maintenance API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::{compensation, subscriptions};
use crate::utils::{AppResponse, AppResult, ok, time};

#[derive(Deserialize)]
pub struct RecalculateRequest {
    pub gym_id: i64,
    /// YYYY-MM; defaults to the current period.
    pub period: Option<String>,
    /// Stop after the sweep phase.
    #[serde(default)]
    pub cleanup_only: bool,
}

/// POST /api/maintenance/expire-subscriptions - 批量过期
pub async fn expire_subscriptions(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<subscriptions::ExpiryRun>>> {
    let run = subscriptions::expire_subscriptions(&state.pool).await?;
    Ok(ok(run))
}

/// POST /api/maintenance/recalculate-salaries - 全馆工资核算
pub async fn recalculate_salaries(
    State(state): State<ServerState>,
    Json(payload): Json<RecalculateRequest>,
) -> AppResult<Json<AppResponse<compensation::PayrollRun>>> {
    let period = payload.period.unwrap_or_else(time::current_period);
    let run = compensation::recalculate_all(
        &state.pool,
        payload.gym_id,
        &period,
        payload.cleanup_only,
    )
    .await?;
    Ok(ok(run))
}
