//! Equipment Repository

use super::{RepoError, RepoResult};
use shared::models::{Equipment, EquipmentCreate, EquipmentUpdate};
use sqlx::SqlitePool;

const EQUIPMENT_SELECT: &str =
    "SELECT id, gym_id, name, purchase_cost, status, created_at, updated_at FROM equipment";

pub async fn find_all(pool: &SqlitePool, gym_id: Option<i64>) -> RepoResult<Vec<Equipment>> {
    let rows = match gym_id {
        Some(gym) => {
            let sql = format!(
                "{EQUIPMENT_SELECT} WHERE gym_id = ? AND status != 'Retired' ORDER BY created_at DESC"
            );
            sqlx::query_as::<_, Equipment>(&sql)
                .bind(gym)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{EQUIPMENT_SELECT} ORDER BY created_at DESC");
            sqlx::query_as::<_, Equipment>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Equipment>> {
    let sql = format!("{EQUIPMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Equipment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: EquipmentCreate) -> RepoResult<Equipment> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO equipment (id, gym_id, name, purchase_cost, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'InService', ?5, ?5)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(&data.name)
    .bind(data.purchase_cost)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create equipment".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: EquipmentUpdate) -> RepoResult<Equipment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE equipment SET name = COALESCE(?1, name), purchase_cost = COALESCE(?2, purchase_cost), status = COALESCE(?3, status), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(data.purchase_cost)
    .bind(&data.status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Equipment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Equipment {id} not found")))
}

/// Retire — expense history keeps its equipment reference.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE equipment SET status = 'Retired', updated_at = ? WHERE id = ? AND status != 'Retired'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
