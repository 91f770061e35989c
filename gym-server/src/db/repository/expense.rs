//! Expense Repository
//!
//! 会话费用行以 (subscription_id, session_date) 为身份键，
//! `idx_expense_session_key` 部分唯一索引保证每个键至多一条非 Cancelled 行。
//! 工资行的 delete-then-insert 在单个事务内完成，读者看不到零行间隙。

use super::{RepoError, RepoResult};
use shared::models::Expense;
use sqlx::SqlitePool;

const EXPENSE_SELECT: &str = "SELECT id, gym_id, expense_type, category, amount, expense_date, status, trainer_id, equipment_id, subscription_id, session_date, provenance, notes, created_at, updated_at FROM expense";

/// Insert payload shared by manual bookkeeping and the engine's own rows.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub gym_id: i64,
    pub expense_type: String,
    pub category: String,
    pub amount: f64,
    pub expense_date: String,
    pub trainer_id: Option<i64>,
    pub equipment_id: Option<i64>,
    pub subscription_id: Option<i64>,
    pub session_date: Option<String>,
    pub provenance: String,
    pub notes: Option<String>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Expense>> {
    let sql = format!("{EXPENSE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Expense>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Filtered ledger read for reporting.
pub async fn list(
    pool: &SqlitePool,
    gym_id: Option<i64>,
    trainer_id: Option<i64>,
    expense_type: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> RepoResult<Vec<Expense>> {
    let sql = format!(
        "{EXPENSE_SELECT} WHERE (?1 IS NULL OR gym_id = ?1) \
           AND (?2 IS NULL OR trainer_id = ?2) \
           AND (?3 IS NULL OR expense_type = ?3) \
           AND (?4 IS NULL OR expense_date >= ?4) \
           AND (?5 IS NULL OR expense_date < ?5) \
         ORDER BY expense_date DESC, created_at DESC"
    );
    let rows = sqlx::query_as::<_, Expense>(&sql)
        .bind(gym_id)
        .bind(trainer_id)
        .bind(expense_type)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Plain insert. Session-fee rows hit the identity-key index here: a
/// second live row for the same key comes back as [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, data: NewExpense) -> RepoResult<Expense> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO expense (id, gym_id, expense_type, category, amount, expense_date, status, trainer_id, equipment_id, subscription_id, session_date, provenance, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'Pending', ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
    )
    .bind(id)
    .bind(data.gym_id)
    .bind(&data.expense_type)
    .bind(&data.category)
    .bind(data.amount)
    .bind(&data.expense_date)
    .bind(data.trainer_id)
    .bind(data.equipment_id)
    .bind(data.subscription_id)
    .bind(&data.session_date)
    .bind(&data.provenance)
    .bind(&data.notes)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create expense".into()))
}

/// Most recent live (non-Cancelled) session expense for the identity key.
pub async fn find_live_session(
    pool: &SqlitePool,
    subscription_id: i64,
    session_date: &str,
) -> RepoResult<Option<Expense>> {
    let sql = format!(
        "{EXPENSE_SELECT} WHERE subscription_id = ?1 AND session_date = ?2 AND status != 'Cancelled' ORDER BY created_at DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Expense>(&sql)
        .bind(subscription_id)
        .bind(session_date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Mark one session expense Cancelled, appending the audit note.
/// Conditional on not already being Cancelled; false = lost the race.
pub async fn cancel_session(pool: &SqlitePool, id: i64, audit_note: &str) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE expense SET status = 'Cancelled', notes = COALESCE(notes || ' ', '') || ?1, updated_at = ?2 WHERE id = ?3 AND status != 'Cancelled'",
    )
    .bind(audit_note)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Cancel every still-open (Pending) session expense of a subscription.
/// Paid rows are settled history and stay untouched.
pub async fn cancel_open_sessions(
    pool: &SqlitePool,
    subscription_id: i64,
    audit_note: &str,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE expense SET status = 'Cancelled', notes = COALESCE(notes || ' ', '') || ?1, updated_at = ?2 WHERE subscription_id = ?3 AND session_date IS NOT NULL AND status = 'Pending'",
    )
    .bind(audit_note)
    .bind(now)
    .bind(subscription_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Count a subscription's session rows by status inside [from, to).
pub async fn count_sessions(
    pool: &SqlitePool,
    subscription_id: i64,
    status_filter: SessionCountFilter,
    from: &str,
    to: &str,
) -> RepoResult<i64> {
    let status_sql = match status_filter {
        SessionCountFilter::Completed => "status != 'Cancelled'",
        SessionCountFilter::Cancelled => "status = 'Cancelled'",
    };
    let sql = format!(
        "SELECT COUNT(*) FROM expense WHERE subscription_id = ?1 AND session_date IS NOT NULL AND session_date >= ?2 AND session_date < ?3 AND {status_sql}"
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(subscription_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Completed = a live row exists for the key (Pending or Paid).
#[derive(Debug, Clone, Copy)]
pub enum SessionCountFilter {
    Completed,
    Cancelled,
}

/// Salary payload for [`replace_salary_rows`].
#[derive(Debug, Clone)]
pub struct NewSalaryRow {
    pub gym_id: i64,
    pub amount: f64,
    pub expense_date: String,
    pub notes: String,
}

/// Atomically replace a trainer's generated salary rows for one period.
///
/// Delete-then-insert runs inside a single transaction so concurrent
/// readers observe either the old row or the new one, never zero rows
/// mid-recalculation. `None` payload means "delete only" (no qualifying
/// members this period).
pub async fn replace_salary_rows(
    pool: &SqlitePool,
    trainer_id: i64,
    period_from: &str,
    period_to: &str,
    new_row: Option<NewSalaryRow>,
) -> RepoResult<u64> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        "DELETE FROM expense WHERE trainer_id = ?1 AND expense_type = 'TrainerSalary' AND provenance = 'SystemAuto' AND expense_date >= ?2 AND expense_date < ?3",
    )
    .bind(trainer_id)
    .bind(period_from)
    .bind(period_to)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if let Some(row) = new_row {
        let now = shared::util::now_millis();
        let id = shared::util::snowflake_id();
        sqlx::query(
            "INSERT INTO expense (id, gym_id, expense_type, category, amount, expense_date, status, trainer_id, provenance, notes, created_at, updated_at) \
             VALUES (?1, ?2, 'TrainerSalary', 'Payroll', ?3, ?4, 'Pending', ?5, 'SystemAuto', ?6, ?7, ?7)",
        )
        .bind(id)
        .bind(row.gym_id)
        .bind(row.amount)
        .bind(&row.expense_date)
        .bind(trainer_id)
        .bind(&row.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(deleted)
}

/// Delete generated salary rows whose trainer no longer has a qualifying
/// assignment (or is gone entirely). Returns the number of rows removed.
pub async fn sweep_invalid_salary(
    pool: &SqlitePool,
    gym_id: i64,
    period_from: &str,
    period_to: &str,
    today: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM expense WHERE gym_id = ?1 AND expense_type = 'TrainerSalary' AND provenance = 'SystemAuto' \
           AND expense_date >= ?2 AND expense_date < ?3 \
           AND (trainer_id IS NULL OR NOT EXISTS (\
                SELECT 1 FROM subscription s JOIN member m ON m.id = s.member_id \
                WHERE s.trainer_id = expense.trainer_id AND s.gym_id = ?1 \
                  AND s.status = 'Active' AND s.end_date >= ?4 AND m.status = 'Active'))",
    )
    .bind(gym_id)
    .bind(period_from)
    .bind(period_to)
    .bind(today)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Generated salary rows for one trainer in a period (reporting, payroll review).
pub async fn list_salary_rows(
    pool: &SqlitePool,
    trainer_id: i64,
    period_from: &str,
    period_to: &str,
) -> RepoResult<Vec<Expense>> {
    let sql = format!(
        "{EXPENSE_SELECT} WHERE trainer_id = ?1 AND expense_type = 'TrainerSalary' AND expense_date >= ?2 AND expense_date < ?3 ORDER BY created_at"
    );
    let rows = sqlx::query_as::<_, Expense>(&sql)
        .bind(trainer_id)
        .bind(period_from)
        .bind(period_to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// CAS settle: Pending → Paid.
pub async fn mark_paid(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE expense SET status = 'Paid', updated_at = ? WHERE id = ? AND status = 'Pending'")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}

/// Hard delete. Paid rows are immutable history — the store refuses them
/// regardless of what the caller already checked.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM expense WHERE id = ? AND status != 'Paid'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
