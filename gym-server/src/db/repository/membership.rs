//! Membership Repository

use super::{RepoError, RepoResult};
use shared::models::{Membership, MembershipCreate, MembershipUpdate};
use sqlx::SqlitePool;

const MEMBERSHIP_SELECT: &str = "SELECT id, gym_id, name, price, duration_months, schedule_slot, requires_trainer, preset_trainer_id, is_active, created_at, updated_at FROM membership";

pub async fn find_all(pool: &SqlitePool, gym_id: Option<i64>) -> RepoResult<Vec<Membership>> {
    let rows = match gym_id {
        Some(gym) => {
            let sql =
                format!("{MEMBERSHIP_SELECT} WHERE gym_id = ? AND is_active = 1 ORDER BY price");
            sqlx::query_as::<_, Membership>(&sql)
                .bind(gym)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{MEMBERSHIP_SELECT} WHERE is_active = 1 ORDER BY price");
            sqlx::query_as::<_, Membership>(&sql)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Membership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Membership>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: MembershipCreate) -> RepoResult<Membership> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO membership (id, gym_id, name, price, duration_months, schedule_slot, requires_trainer, preset_trainer_id, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.duration_months)
    .bind(data.schedule_slot.map(|s| s.as_str()))
    .bind(data.requires_trainer)
    .bind(data.preset_trainer_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create membership".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MembershipUpdate) -> RepoResult<Membership> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE membership SET name = COALESCE(?1, name), price = COALESCE(?2, price), duration_months = COALESCE(?3, duration_months), schedule_slot = COALESCE(?4, schedule_slot), requires_trainer = COALESCE(?5, requires_trainer), preset_trainer_id = COALESCE(?6, preset_trainer_id), is_active = COALESCE(?7, is_active), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.duration_months)
    .bind(data.schedule_slot.map(|s| s.as_str()))
    .bind(data.requires_trainer)
    .bind(data.preset_trainer_id)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Membership {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Membership {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE membership SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}
