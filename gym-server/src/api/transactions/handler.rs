//! Ledger Transaction API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::ledger_transaction;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::LedgerTransaction;

#[derive(Deserialize)]
pub struct ListQuery {
    pub subscription_id: Option<i64>,
}

/// GET /api/transactions - 升级/续费差额流水（按订阅过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<LedgerTransaction>>>> {
    let rows = ledger_transaction::list(&state.pool, query.subscription_id).await?;
    Ok(ok(rows))
}
