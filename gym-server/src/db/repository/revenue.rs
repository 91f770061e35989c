//! Revenue Repository
//!
//! 收入行可能先于订阅存在（入会时预收款），`subscription_id` 为 NULL；
//! 注册订阅时优先回链已有的未关联行，而不是重复开一条。

use super::{RepoError, RepoResult};
use shared::models::Revenue;
use sqlx::SqlitePool;

const REVENUE_SELECT: &str = "SELECT id, gym_id, member_id, membership_id, subscription_id, amount, revenue_date, created_at, updated_at FROM revenue";

/// Insert payload shared by onboarding payments and engine side effects.
#[derive(Debug, Clone)]
pub struct NewRevenue {
    pub gym_id: i64,
    pub member_id: i64,
    pub membership_id: i64,
    pub subscription_id: Option<i64>,
    pub amount: f64,
    pub revenue_date: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Revenue>> {
    let sql = format!("{REVENUE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Revenue>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(
    pool: &SqlitePool,
    gym_id: Option<i64>,
    member_id: Option<i64>,
) -> RepoResult<Vec<Revenue>> {
    let sql = format!(
        "{REVENUE_SELECT} WHERE (?1 IS NULL OR gym_id = ?1) AND (?2 IS NULL OR member_id = ?2) ORDER BY revenue_date DESC, created_at DESC"
    );
    let rows = sqlx::query_as::<_, Revenue>(&sql)
        .bind(gym_id)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: NewRevenue) -> RepoResult<Revenue> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO revenue (id, gym_id, member_id, membership_id, subscription_id, amount, revenue_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(data.member_id)
    .bind(data.membership_id)
    .bind(data.subscription_id)
    .bind(data.amount)
    .bind(&data.revenue_date)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create revenue".into()))
}

/// Back-link the most recent unlinked revenue row for member+membership to
/// the freshly created subscription. Returns false when no such row exists
/// (the caller then records a fresh one).
pub async fn back_link_unlinked(
    pool: &SqlitePool,
    member_id: i64,
    membership_id: i64,
    subscription_id: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE revenue SET subscription_id = ?1, updated_at = ?2 WHERE id = (\
            SELECT id FROM revenue WHERE member_id = ?3 AND membership_id = ?4 AND subscription_id IS NULL \
            ORDER BY created_at DESC LIMIT 1)",
    )
    .bind(subscription_id)
    .bind(now)
    .bind(member_id)
    .bind(membership_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove the revenue rows of a subscription being deleted.
///
/// Direct `subscription_id` match first; only when nothing is linked does
/// the fallback remove unlinked member+membership rows (legacy data from
/// before the row was back-linked).
pub async fn delete_for_subscription(
    pool: &SqlitePool,
    subscription_id: i64,
    member_id: i64,
    membership_id: i64,
) -> RepoResult<u64> {
    let direct = sqlx::query("DELETE FROM revenue WHERE subscription_id = ?")
        .bind(subscription_id)
        .execute(pool)
        .await?
        .rows_affected();
    if direct > 0 {
        return Ok(direct);
    }
    let fallback = sqlx::query(
        "DELETE FROM revenue WHERE member_id = ?1 AND membership_id = ?2 AND subscription_id IS NULL",
    )
    .bind(member_id)
    .bind(membership_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(fallback)
}
