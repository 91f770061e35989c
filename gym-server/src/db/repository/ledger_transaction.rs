//! Ledger Transaction Repository
//!
//! Signed deltas for plan upgrades and renewals. Rows belong to their
//! subscription (ON DELETE CASCADE); prior revenue rows are never mutated.

use super::{RepoError, RepoResult};
use shared::models::LedgerTransaction;
use sqlx::SqlitePool;

const TRANSACTION_SELECT: &str =
    "SELECT id, gym_id, subscription_id, amount, kind, note, created_at FROM ledger_transaction";

/// Insert payload — amount is signed (negative on downgrades).
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub gym_id: i64,
    pub subscription_id: i64,
    pub amount: f64,
    pub kind: String,
    pub note: Option<String>,
}

pub async fn list(pool: &SqlitePool, subscription_id: Option<i64>) -> RepoResult<Vec<LedgerTransaction>> {
    let sql = format!(
        "{TRANSACTION_SELECT} WHERE (?1 IS NULL OR subscription_id = ?1) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, LedgerTransaction>(&sql)
        .bind(subscription_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: NewTransaction) -> RepoResult<LedgerTransaction> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO ledger_transaction (id, gym_id, subscription_id, amount, kind, note, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(data.subscription_id)
    .bind(data.amount)
    .bind(&data.kind)
    .bind(&data.note)
    .bind(now)
    .execute(pool)
    .await?;
    let sql = format!("{TRANSACTION_SELECT} WHERE id = ?");
    sqlx::query_as::<_, LedgerTransaction>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ledger transaction".into()))
}

/// Explicit cleanup on subscription delete. The FK cascade would catch
/// these anyway; deleting first keeps the count observable for warnings.
pub async fn delete_for_subscription(pool: &SqlitePool, subscription_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM ledger_transaction WHERE subscription_id = ?")
        .bind(subscription_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
