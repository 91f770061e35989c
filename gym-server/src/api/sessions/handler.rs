//! Session API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::sessions;
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};
use shared::models::Expense;

#[derive(Deserialize)]
pub struct CompleteRequest {
    pub subscription_id: i64,
    /// YYYY-MM-DD
    pub session_date: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub subscription_id: i64,
    /// YYYY-MM-DD
    pub session_date: String,
    pub actor: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct CancelResult {
    /// false = 无可取消的行（no-op，而非错误）
    pub cancelled: bool,
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub subscription_id: i64,
    pub month: u32,
    pub year: i32,
}

/// POST /api/sessions/complete - 记一节已完成课时
pub async fn complete(
    State(state): State<ServerState>,
    Json(payload): Json<CompleteRequest>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let expense = sessions::complete(
        &state.pool,
        payload.subscription_id,
        &payload.session_date,
        payload.notes,
    )
    .await?;
    Ok(ok(expense))
}

/// POST /api/sessions/cancel - 取消课时（无对应行时为 no-op）
pub async fn cancel(
    State(state): State<ServerState>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<AppResponse<CancelResult>>> {
    let cancelled = sessions::cancel(
        &state.pool,
        payload.subscription_id,
        &payload.session_date,
        &payload.actor,
        &payload.reason,
    )
    .await?;
    let message = if cancelled {
        "Session cancelled"
    } else {
        "No session to cancel"
    };
    Ok(ok_with_message(CancelResult { cancelled }, message))
}

/// GET /api/sessions/summary?subscription_id=&month=&year= - 月度用量
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<AppResponse<sessions::SessionSummary>>> {
    let summary = sessions::summary(
        &state.pool,
        query.subscription_id,
        query.month,
        query.year,
    )
    .await?;
    Ok(ok(summary))
}
