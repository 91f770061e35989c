//! Gym Repository

use super::{RepoError, RepoResult};
use shared::models::{Gym, GymCreate, GymUpdate};
use sqlx::SqlitePool;

const GYM_SELECT: &str = "SELECT id, name, address, is_active, created_at, updated_at FROM gym";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Gym>> {
    let sql = format!("{GYM_SELECT} WHERE is_active = 1 ORDER BY created_at");
    let rows = sqlx::query_as::<_, Gym>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Gym>> {
    let sql = format!("{GYM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Gym>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: GymCreate) -> RepoResult<Gym> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO gym (id, name, address, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.address)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create gym".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: GymUpdate) -> RepoResult<Gym> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE gym SET name = COALESCE(?1, name), address = COALESCE(?2, address), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Gym {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Gym {id} not found")))
}

/// Deactivate — historical rows keep their gym reference.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE gym SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}
