//! Compensation Calculator
//!
//! 工资政策：教练在本馆有 ≥1 个 Active 且未到期的会员指派 → 发全额
//! `salary`，否则为 0 —— 不按会员数或课时数折算。
//!
//! Recalculation is delete-then-insert inside one storage transaction
//! (`expense::replace_salary_rows`), so a concurrent reader sees either
//! the old salary row or the new one, never a zero-row gap. Running it
//! twice with no intervening state change produces the identical result.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository::{expense, subscription, trainer};
use crate::db::repository::expense::NewSalaryRow;
use crate::services::{SESSIONS_PER_MONTH, money};
use crate::utils::{AppResult, time};
use rust_decimal::Decimal;

/// Full-gym payroll run result.
#[derive(Debug, Default, serde::Serialize)]
pub struct PayrollRun {
    /// Stale salary rows removed by the sweep phase.
    pub swept: u64,
    /// Trainers successfully recalculated (0 in cleanup-only mode).
    pub recalculated: usize,
    /// Per-trainer failures, reported instead of aborting the run.
    pub warnings: Vec<String>,
}

/// Per-session rate derived from the monthly salary.
///
/// With a known schedule pattern the month is exactly the quota of
/// sessions; without one the salary is first apportioned across the
/// trainer's active members.
pub fn session_rate(salary: f64, schedule_known: bool, active_members: i64) -> f64 {
    if salary <= 0.0 {
        return 0.0;
    }
    let salary = money::to_decimal(salary);
    let quota = Decimal::from(SESSIONS_PER_MONTH);
    let rate = if schedule_known {
        salary / quota
    } else {
        salary / Decimal::from(active_members.max(1)) / quota
    };
    money::to_f64(rate)
}

/// Rebuild one trainer's salary expense for the period.
///
/// Deletes the trainer's generated rows in the period and inserts exactly
/// one fresh Pending row for the full salary, annotated with the active
/// member list — or nothing when no qualifying assignment (or no salary)
/// remains. The pair runs in a single transaction.
pub async fn recalculate(
    pool: &SqlitePool,
    trainer_id: i64,
    gym_id: i64,
    period: &str,
) -> AppResult<()> {
    let (from, to) = time::period_range(period)?;
    let today = time::today_string();

    let trainer = trainer::find_by_id(pool, trainer_id).await?;
    let assignments = subscription::active_assignments(pool, trainer_id, gym_id, &today).await?;

    let new_row = match trainer {
        Some(t) if t.status == "Active" && t.gym_id == gym_id && !assignments.is_empty() => {
            t.salary.map(|salary| {
                let members: Vec<&str> =
                    assignments.iter().map(|a| a.member_name.as_str()).collect();
                NewSalaryRow {
                    gym_id,
                    amount: salary,
                    expense_date: from.clone(),
                    notes: format!("Salary {period} · members: {}", members.join(", ")),
                }
            })
        }
        _ => None,
    };

    let inserted = new_row.is_some();
    let deleted = expense::replace_salary_rows(pool, trainer_id, &from, &to, new_row).await?;
    info!(
        trainer_id,
        period, deleted, inserted, "Trainer compensation recalculated"
    );
    Ok(())
}

/// Delete every generated salary expense in the period whose trainer no
/// longer has a qualifying active member (or is gone). Usable standalone
/// and as phase one of [`recalculate_all`].
pub async fn sweep_invalid(pool: &SqlitePool, gym_id: i64, period: &str) -> AppResult<u64> {
    let (from, to) = time::period_range(period)?;
    let today = time::today_string();
    let swept = expense::sweep_invalid_salary(pool, gym_id, &from, &to, &today).await?;
    if swept > 0 {
        info!(gym_id, period, swept, "Swept invalid salary expenses");
    }
    Ok(swept)
}

/// Full-gym payroll run: sweep, then recalculate every salaried trainer.
///
/// Per-trainer failures degrade to warnings so one broken trainer cannot
/// block the rest of the gym's payroll. Safe to re-fire: every phase is
/// idempotent.
pub async fn recalculate_all(
    pool: &SqlitePool,
    gym_id: i64,
    period: &str,
    cleanup_only: bool,
) -> AppResult<PayrollRun> {
    let mut run = PayrollRun {
        swept: sweep_invalid(pool, gym_id, period).await?,
        ..PayrollRun::default()
    };
    if cleanup_only {
        return Ok(run);
    }

    for t in trainer::find_salaried(pool, gym_id).await? {
        match recalculate(pool, t.id, gym_id, period).await {
            Ok(()) => run.recalculated += 1,
            Err(e) => {
                warn!(trainer_id = t.id, error = %e, "Salary recalculation failed");
                run.warnings
                    .push(format!("Salary recalculation for trainer {} failed: {e}", t.id));
            }
        }
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_with_known_schedule_divides_by_quota() {
        assert_eq!(session_rate(6_000_000.0, true, 3), 500_000.0);
    }

    #[test]
    fn rate_without_schedule_apportions_across_members() {
        assert_eq!(session_rate(6_000_000.0, false, 2), 250_000.0);
        // zero members falls back to 1, not a division by zero
        assert_eq!(session_rate(6_000_000.0, false, 0), 500_000.0);
    }

    #[test]
    fn rate_is_zero_without_salary() {
        assert_eq!(session_rate(0.0, true, 3), 0.0);
        assert_eq!(session_rate(-100.0, true, 3), 0.0);
    }

    #[test]
    fn rate_rounds_to_two_decimals() {
        // 1000 / 12 = 83.333...
        assert_eq!(session_rate(1000.0, true, 1), 83.33);
    }
}
