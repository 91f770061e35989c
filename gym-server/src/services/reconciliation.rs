//! Reconciliation Coordinator
//!
//! Thin orchestration between the subscription state machine, the session
//! ledger and the compensation calculator. This is the only module that
//! calls across those boundaries, and it holds no ledger logic of its own.
//!
//! 订阅主写入已提交后才运行；任何失败都降级为 warning 字符串返回给
//! 调用方（绝不回滚订阅本身），sweep / recalculate 随时可重跑自愈。

use sqlx::SqlitePool;
use tracing::warn;

use crate::services::{compensation, sessions};
use crate::utils::time;
use shared::models::Subscription;

/// Recalculate compensation for every trainer touched by an assignment
/// change — at most two per mutation (old and new).
pub async fn on_assignment_changed(
    pool: &SqlitePool,
    gym_id: i64,
    old_trainer: Option<i64>,
    new_trainer: Option<i64>,
) -> Vec<String> {
    let period = time::current_period();
    let mut touched: Vec<i64> = old_trainer.into_iter().chain(new_trainer).collect();
    touched.dedup();

    let mut warnings = Vec::new();
    for trainer_id in touched {
        if let Err(e) = compensation::recalculate(pool, trainer_id, gym_id, &period).await {
            warn!(trainer_id, error = %e, "Compensation recalculation failed after assignment change");
            warnings.push(format!(
                "Compensation recalculation for trainer {trainer_id} failed: {e}"
            ));
        }
    }
    warnings
}

/// Close out a subscription's open sessions ahead of a terminal
/// transition (or deletion). Runs before the CAS write so the transition
/// never completes with billable sessions still open.
pub async fn on_subscription_terminating(
    pool: &SqlitePool,
    sub: &Subscription,
    reason: &str,
) -> Vec<String> {
    match sessions::cancel_open_for(pool, sub.id, reason).await {
        Ok(cancelled) => {
            if cancelled > 0 {
                tracing::info!(subscription_id = sub.id, cancelled, reason, "Open sessions cancelled");
            }
            Vec::new()
        }
        Err(e) => {
            warn!(subscription_id = sub.id, error = %e, "Failed to cancel open sessions");
            vec![format!(
                "Failed to cancel open sessions for subscription {}: {e}",
                sub.id
            )]
        }
    }
}
