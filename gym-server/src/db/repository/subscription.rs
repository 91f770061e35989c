//! Subscription Repository
//!
//! 槽位独占约束由 `idx_subscription_trainer_slot` 部分唯一索引保证；
//! 状态迁移使用 `WHERE status = 'Active'` 条件写，丢失竞争的一方
//! 通过 `rows_affected() == 0` 判断，不会覆盖已终结的行。

use super::{RepoError, RepoResult};
use shared::models::Subscription;
use sqlx::SqlitePool;

const SUBSCRIPTION_SELECT: &str = "SELECT id, gym_id, member_id, membership_id, trainer_id, schedule_slot, start_date, end_date, status, created_at, updated_at FROM subscription";

/// Insert payload — the service layer has already derived the trainer
/// assignment and validated references.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub gym_id: i64,
    pub member_id: i64,
    pub membership_id: i64,
    pub trainer_id: Option<i64>,
    pub schedule_slot: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Subscription>> {
    let sql = format!("{SUBSCRIPTION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Subscription>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(
    pool: &SqlitePool,
    gym_id: Option<i64>,
    member_id: Option<i64>,
) -> RepoResult<Vec<Subscription>> {
    let sql = format!(
        "{SUBSCRIPTION_SELECT} WHERE (?1 IS NULL OR gym_id = ?1) AND (?2 IS NULL OR member_id = ?2) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Subscription>(&sql)
        .bind(gym_id)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Conditional insert: the partial unique index rejects a second Active
/// holder of (trainer, slot) and surfaces as [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, data: NewSubscription) -> RepoResult<Subscription> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO subscription (id, gym_id, member_id, membership_id, trainer_id, schedule_slot, start_date, end_date, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'Active', ?9, ?9)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(data.member_id)
    .bind(data.membership_id)
    .bind(data.trainer_id)
    .bind(&data.schedule_slot)
    .bind(&data.start_date)
    .bind(&data.end_date)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create subscription".into()))
}

/// Swap the trainer assignment (or strip it with `None, None`).
/// Slot conflicts surface as Duplicate via the partial unique index.
pub async fn reassign(
    pool: &SqlitePool,
    id: i64,
    trainer_id: Option<i64>,
    schedule_slot: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE subscription SET trainer_id = ?1, schedule_slot = ?2, updated_at = ?3 WHERE id = ?4 AND status = 'Active'",
    )
    .bind(trainer_id)
    .bind(schedule_slot)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Subscription {id} not found or not Active"
        )));
    }
    Ok(())
}

/// Plan swap: membership + re-derived assignment in one write.
pub async fn change_membership(
    pool: &SqlitePool,
    id: i64,
    membership_id: i64,
    trainer_id: Option<i64>,
    schedule_slot: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE subscription SET membership_id = ?1, trainer_id = ?2, schedule_slot = ?3, updated_at = ?4 WHERE id = ?5 AND status = 'Active'",
    )
    .bind(membership_id)
    .bind(trainer_id)
    .bind(schedule_slot)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Subscription {id} not found or not Active"
        )));
    }
    Ok(())
}

pub async fn extend_end_date(pool: &SqlitePool, id: i64, end_date: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE subscription SET end_date = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'Active'",
    )
    .bind(end_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Subscription {id} not found or not Active"
        )));
    }
    Ok(())
}

/// CAS terminal transition. Returns false when another handler already
/// terminated the row — callers treat that as "nothing left to do".
pub async fn transition(pool: &SqlitePool, id: i64, to_status: &str) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE subscription SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'Active'",
    )
    .bind(to_status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM subscription WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Active subscriptions whose end_date has passed — the expiry sweep input.
pub async fn find_due_expiry(pool: &SqlitePool, today: &str) -> RepoResult<Vec<Subscription>> {
    let sql = format!("{SUBSCRIPTION_SELECT} WHERE status = 'Active' AND end_date < ?");
    let rows = sqlx::query_as::<_, Subscription>(&sql)
        .bind(today)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// A trainer's qualifying assignment: Active, non-expired, gym-matching,
/// member still Active.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssignmentRow {
    pub subscription_id: i64,
    pub member_id: i64,
    pub member_name: String,
}

pub async fn active_assignments(
    pool: &SqlitePool,
    trainer_id: i64,
    gym_id: i64,
    today: &str,
) -> RepoResult<Vec<AssignmentRow>> {
    let rows = sqlx::query_as::<_, AssignmentRow>(
        "SELECT s.id AS subscription_id, m.id AS member_id, m.name AS member_name \
         FROM subscription s JOIN member m ON m.id = s.member_id \
         WHERE s.trainer_id = ?1 AND s.gym_id = ?2 AND s.status = 'Active' \
           AND s.end_date >= ?3 AND m.status = 'Active' \
         ORDER BY m.name",
    )
    .bind(trainer_id)
    .bind(gym_id)
    .bind(today)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
