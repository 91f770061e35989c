//! Expense API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::expense;
use crate::db::repository::expense::NewExpense;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, time};
use shared::models::{Expense, ExpenseCreate};
use shared::types::{ExpenseType, Provenance};

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
    pub trainer_id: Option<i64>,
    pub expense_type: Option<ExpenseType>,
    /// YYYY-MM-DD, inclusive
    pub from: Option<String>,
    /// YYYY-MM-DD, exclusive
    pub to: Option<String>,
}

/// GET /api/expenses - 支出列表（按场馆/教练/类型/日期过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Expense>>>> {
    if let Some(ref d) = query.from {
        time::parse_date(d)?;
    }
    if let Some(ref d) = query.to {
        time::parse_date(d)?;
    }
    let rows = expense::list(
        &state.pool,
        query.gym_id,
        query.trainer_id,
        query.expense_type.map(|t| t.as_str()),
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await?;
    Ok(ok(rows))
}

/// GET /api/expenses/:id - 获取单条支出
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let row = expense::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {id}")))?;
    Ok(ok(row))
}

/// POST /api/expenses - 手工记账（仅 Equipment / Other）
///
/// TrainerSalary 与 SessionFee 行由引擎派生，拒绝手工写入。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<AppResponse<Expense>>> {
    if matches!(
        payload.expense_type,
        ExpenseType::TrainerSalary | ExpenseType::SessionFee
    ) {
        return Err(AppError::validation(format!(
            "{} expenses are system-derived and cannot be entered manually",
            payload.expense_type.as_str()
        )));
    }
    validate_amount(payload.amount, "amount")?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let expense_date = match payload.expense_date {
        Some(d) => {
            time::parse_date(&d)?;
            d
        }
        None => time::today_string(),
    };

    let row = expense::create(
        &state.pool,
        NewExpense {
            gym_id: payload.gym_id,
            expense_type: payload.expense_type.as_str().into(),
            category: payload.category.unwrap_or_default(),
            amount: payload.amount,
            expense_date,
            trainer_id: payload.trainer_id,
            equipment_id: payload.equipment_id,
            subscription_id: None,
            session_date: None,
            provenance: Provenance::Manual.as_str().into(),
            notes: payload.notes,
        },
    )
    .await?;
    Ok(ok(row))
}

/// POST /api/expenses/:id/pay - 结算（Pending → Paid）
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let paid = expense::mark_paid(&state.pool, id).await?;
    if !paid {
        let row = expense::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Expense {id}")))?;
        return Err(AppError::conflict(format!(
            "Expense {id} is {} and cannot be paid",
            row.status
        )));
    }
    let row = expense::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {id}")))?;
    Ok(ok(row))
}

/// DELETE /api/expenses/:id - 删除（Paid 行为不可变历史，拒绝删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let row = expense::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {id}")))?;
    if row.is_paid() {
        return Err(AppError::business_rule(format!(
            "Expense {id} is Paid; settled rows cannot be deleted"
        )));
    }
    let removed = expense::delete(&state.pool, id).await?;
    Ok(ok(removed))
}
