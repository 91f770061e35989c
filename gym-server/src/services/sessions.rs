//! Session Ledger
//!
//! 每节私教课以 (subscription_id, session_date) 为身份键，物化为一条
//! SessionFee expense。幂等不变量：每个键至多一条非 Cancelled 行 ——
//! 由 `idx_expense_session_key` 部分唯一索引兜底，预检只是为了给出
//! 更友好的错误信息。
//!
//! Cancellation appends an audit note and never hard-deletes; a cancel on
//! a never-completed session is a silent no-op, not an error.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::repository::expense::{NewExpense, SessionCountFilter};
use crate::db::repository::{RepoError, expense, subscription, trainer};
use crate::services::{SESSIONS_PER_MONTH, compensation};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::Expense;
use shared::types::{ExpenseType, Provenance, SubscriptionStatus};

/// Monthly session usage for one subscription.
#[derive(Debug, serde::Serialize)]
pub struct SessionSummary {
    pub subscription_id: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// `quota − completed`, floored at zero.
    pub remaining: i64,
    pub quota: i64,
}

/// Record a completed session as a Pending SessionFee expense.
///
/// Fails with Conflict when a live expense already exists for the key and
/// with BusinessRule when the subscription has no trainer assigned.
pub async fn complete(
    pool: &SqlitePool,
    subscription_id: i64,
    session_date: &str,
    notes: Option<String>,
) -> AppResult<Expense> {
    let date = time::parse_date(session_date)?;
    time::ensure_not_future(date, "session_date")?;
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;

    let sub = subscription::find_by_id(pool, subscription_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {subscription_id}")))?;
    if sub.status() != Some(SubscriptionStatus::Active) {
        return Err(AppError::business_rule(format!(
            "Subscription {subscription_id} is {}; sessions can only be completed while Active",
            sub.status
        )));
    }
    let Some(trainer_id) = sub.trainer_id else {
        return Err(AppError::business_rule(format!(
            "Subscription {subscription_id} has no trainer assigned"
        )));
    };

    // Friendlier error ahead of the index; the index still decides races.
    if expense::find_live_session(pool, subscription_id, session_date)
        .await?
        .is_some()
    {
        return Err(already_completed(subscription_id, session_date));
    }

    let t = trainer::find_by_id(pool, trainer_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Trainer {trainer_id}")))?;
    let today = time::today_string();
    let active_members = subscription::active_assignments(pool, trainer_id, sub.gym_id, &today)
        .await?
        .len() as i64;
    let rate = compensation::session_rate(
        t.salary.unwrap_or(0.0),
        sub.schedule_slot().is_some(),
        active_members,
    );

    let row = expense::create(
        pool,
        NewExpense {
            gym_id: sub.gym_id,
            expense_type: ExpenseType::SessionFee.as_str().into(),
            category: "PT Session".into(),
            amount: rate,
            expense_date: session_date.to_string(),
            trainer_id: Some(trainer_id),
            equipment_id: None,
            subscription_id: Some(subscription_id),
            session_date: Some(session_date.to_string()),
            provenance: Provenance::SystemAuto.as_str().into(),
            notes: notes.or_else(|| Some(format!("PT session with {}", t.name))),
        },
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(_) => already_completed(subscription_id, session_date),
        other => other.into(),
    })?;

    info!(
        subscription_id,
        session_date,
        trainer_id,
        amount = rate,
        "Session completed"
    );
    Ok(row)
}

fn already_completed(subscription_id: i64, session_date: &str) -> AppError {
    AppError::conflict(format!(
        "Session for subscription {subscription_id} on {session_date} is already completed"
    ))
}

/// Cancel the live session expense for the key, appending an audit note.
///
/// Returns false (a no-op, not an error) when no live expense exists for
/// the key — a double cancel or a cancel of a never-completed session.
pub async fn cancel(
    pool: &SqlitePool,
    subscription_id: i64,
    session_date: &str,
    actor: &str,
    reason: &str,
) -> AppResult<bool> {
    time::parse_date(session_date)?;
    validate_required_text(actor, "actor", MAX_NAME_LEN)?;
    validate_required_text(reason, "reason", MAX_NOTE_LEN)?;

    let Some(row) = expense::find_live_session(pool, subscription_id, session_date).await? else {
        debug!(subscription_id, session_date, "Session cancel is a no-op: nothing to cancel");
        return Ok(false);
    };

    let note = format!("[cancelled by {actor}: {reason}]");
    let cancelled = expense::cancel_session(pool, row.id, &note).await?;
    if cancelled {
        info!(subscription_id, session_date, expense_id = row.id, "Session cancelled");
    }
    Ok(cancelled)
}

/// Cancel every still-open session of a subscription (terminal transitions
/// and deletes). Paid rows are settled history and stay untouched.
pub async fn cancel_open_for(
    pool: &SqlitePool,
    subscription_id: i64,
    reason: &str,
) -> AppResult<u64> {
    let note = format!("[cancelled by system: {reason}]");
    Ok(expense::cancel_open_sessions(pool, subscription_id, &note).await?)
}

/// Completed/cancelled counts and remaining quota for one month.
pub async fn summary(
    pool: &SqlitePool,
    subscription_id: i64,
    month: u32,
    year: i32,
) -> AppResult<SessionSummary> {
    subscription::find_by_id(pool, subscription_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {subscription_id}")))?;
    let (from, to) = time::month_range(year, month)?;
    let completed =
        expense::count_sessions(pool, subscription_id, SessionCountFilter::Completed, &from, &to)
            .await?;
    let cancelled =
        expense::count_sessions(pool, subscription_id, SessionCountFilter::Cancelled, &from, &to)
            .await?;
    Ok(SessionSummary {
        subscription_id,
        completed,
        cancelled,
        remaining: (SESSIONS_PER_MONTH - completed).max(0),
        quota: SESSIONS_PER_MONTH,
    })
}
