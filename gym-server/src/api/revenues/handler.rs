//! Revenue API Handlers
//!
//! 手工入口仅用于入会预收款（订阅尚不存在时）；注册订阅会优先
//! 回链这些未关联的行，而不是重复记收入。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::revenue::NewRevenue;
use crate::db::repository::{member, membership, revenue};
use crate::utils::validation::validate_amount;
use crate::utils::{AppError, AppResponse, AppResult, ok, time};
use shared::models::{Revenue, RevenueCreate};

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
    pub member_id: Option<i64>,
}

/// GET /api/revenues - 收入列表（按场馆/会员过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Revenue>>>> {
    let rows = revenue::list(&state.pool, query.gym_id, query.member_id).await?;
    Ok(ok(rows))
}

/// POST /api/revenues - 记一笔入会预收款（未关联订阅）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RevenueCreate>,
) -> AppResult<Json<AppResponse<Revenue>>> {
    validate_amount(payload.amount, "amount")?;
    let m = member::find_by_id(&state.pool, payload.member_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {}", payload.member_id)))?;
    membership::find_by_id(&state.pool, payload.membership_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Membership {}", payload.membership_id)))?;
    let revenue_date = match payload.revenue_date {
        Some(d) => {
            time::parse_date(&d)?;
            d
        }
        None => time::today_string(),
    };

    let row = revenue::create(
        &state.pool,
        NewRevenue {
            gym_id: m.gym_id,
            member_id: payload.member_id,
            membership_id: payload.membership_id,
            subscription_id: None,
            amount: payload.amount,
            revenue_date,
        },
    )
    .await?;
    Ok(ok(row))
}
