//! Trainer Repository

use super::{RepoError, RepoResult};
use shared::models::{Trainer, TrainerCreate, TrainerUpdate};
use shared::types::ScheduleSlot;
use sqlx::SqlitePool;

const TRAINER_SELECT: &str =
    "SELECT id, gym_id, name, phone, salary, status, created_at, updated_at FROM trainer";

pub async fn find_all(pool: &SqlitePool, gym_id: Option<i64>) -> RepoResult<Vec<Trainer>> {
    let rows = match gym_id {
        Some(gym) => {
            let sql = format!(
                "{TRAINER_SELECT} WHERE gym_id = ? AND status != 'Deleted' ORDER BY created_at DESC"
            );
            sqlx::query_as::<_, Trainer>(&sql)
                .bind(gym)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql =
                format!("{TRAINER_SELECT} WHERE status != 'Deleted' ORDER BY created_at DESC");
            sqlx::query_as::<_, Trainer>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Trainer>> {
    let sql = format!("{TRAINER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Trainer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Active trainers in the gym with a free capacity unit for the pattern:
/// no Active, non-expired subscription may already hold (trainer, slot).
///
/// Anti-join instead of a two-step read so a concurrent enrollment can at
/// worst make the result stale, never wrong about rows it does return.
pub async fn find_available(
    pool: &SqlitePool,
    gym_id: i64,
    slot: ScheduleSlot,
    today: &str,
) -> RepoResult<Vec<Trainer>> {
    let sql = format!(
        "{TRAINER_SELECT} AS t WHERE t.gym_id = ?1 AND t.status = 'Active' AND NOT EXISTS (\
            SELECT 1 FROM subscription s \
            WHERE s.trainer_id = t.id AND s.schedule_slot = ?2 \
              AND s.status = 'Active' AND s.end_date >= ?3\
         ) ORDER BY t.created_at"
    );
    let rows = sqlx::query_as::<_, Trainer>(&sql)
        .bind(gym_id)
        .bind(slot.as_str())
        .bind(today)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Salaried, Active trainers — the population of a full-gym payroll run.
pub async fn find_salaried(pool: &SqlitePool, gym_id: i64) -> RepoResult<Vec<Trainer>> {
    let sql = format!(
        "{TRAINER_SELECT} WHERE gym_id = ? AND status = 'Active' AND salary IS NOT NULL ORDER BY created_at"
    );
    let rows = sqlx::query_as::<_, Trainer>(&sql)
        .bind(gym_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: TrainerCreate) -> RepoResult<Trainer> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO trainer (id, gym_id, name, phone, salary, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'Active', ?6, ?6)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(data.salary)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create trainer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TrainerUpdate) -> RepoResult<Trainer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE trainer SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), salary = COALESCE(?3, salary), status = COALESCE(?4, status), updated_at = ?5 WHERE id = ?6 AND status != 'Deleted'",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(data.salary)
    .bind(&data.status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Trainer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Trainer {id} not found")))
}

/// Soft delete — compensation history keeps its trainer reference.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE trainer SET status = 'Deleted', updated_at = ? WHERE id = ? AND status != 'Deleted'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
