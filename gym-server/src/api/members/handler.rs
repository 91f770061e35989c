//! Member API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::member;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Member, MemberCreate, MemberUpdate};

#[derive(Deserialize)]
pub struct ListQuery {
    pub gym_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/members - 获取所有会员
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Member>>>> {
    let members = member::find_all(&state.pool, query.gym_id).await?;
    Ok(ok(members))
}

/// GET /api/members/search?q=xxx - 搜索会员
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<AppResponse<Vec<Member>>>> {
    let members = member::search(&state.pool, &query.q).await?;
    Ok(ok(members))
}

/// GET /api/members/:id - 获取单个会员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Member>>> {
    let member = member::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {id}")))?;
    Ok(ok(member))
}

/// POST /api/members - 创建会员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<AppResponse<Member>>> {
    validate_member_texts(&payload.name, &payload.phone, &payload.email)?;
    let member = member::create(&state.pool, payload).await?;
    Ok(ok(member))
}

/// PUT /api/members/:id - 更新会员
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<AppResponse<Member>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    let member = member::update(&state.pool, id, payload).await?;
    Ok(ok(member))
}

/// DELETE /api/members/:id - 删除会员（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let removed = member::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Member {id}")));
    }
    Ok(ok(true))
}

fn validate_member_texts(
    name: &str,
    phone: &Option<String>,
    email: &Option<String>,
) -> AppResult<()> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    Ok(())
}
