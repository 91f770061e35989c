//! Member Repository

use super::{RepoError, RepoResult};
use shared::models::{Member, MemberCreate, MemberUpdate};
use sqlx::SqlitePool;

const MEMBER_SELECT: &str =
    "SELECT id, gym_id, name, phone, email, status, created_at, updated_at FROM member";

pub async fn find_all(pool: &SqlitePool, gym_id: Option<i64>) -> RepoResult<Vec<Member>> {
    let rows = match gym_id {
        Some(gym) => {
            let sql = format!(
                "{MEMBER_SELECT} WHERE gym_id = ? AND status != 'Deleted' ORDER BY created_at DESC"
            );
            sqlx::query_as::<_, Member>(&sql)
                .bind(gym)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{MEMBER_SELECT} WHERE status != 'Deleted' ORDER BY created_at DESC");
            sqlx::query_as::<_, Member>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Member>> {
    let pattern = format!("%{query}%");
    let sql = format!(
        "{MEMBER_SELECT} WHERE status != 'Deleted' AND (name LIKE ?1 OR phone LIKE ?1 OR email LIKE ?1) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Member>(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: MemberCreate) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO member (id, gym_id, name, phone, email, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'Active', ?6, ?6)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create member".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MemberUpdate) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), email = COALESCE(?3, email), status = COALESCE(?4, status), updated_at = ?5 WHERE id = ?6 AND status != 'Deleted'",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))
}

/// Soft delete — ledger rows keep their member reference.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET status = 'Deleted', updated_at = ? WHERE id = ? AND status != 'Deleted'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
