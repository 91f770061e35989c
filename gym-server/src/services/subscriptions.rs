//! Subscription State Machine
//!
//! 订阅状态机：Active → {Cancelled, Expired}，两个目标态均为终态。
//! 每次变更驱动账本副作用（revenue / ledger_transaction），并把受影响
//! 的教练（至多新旧两名）交给对账协调器重算工资。
//!
//! The subscription write is authoritative: ledger side effects that fail
//! after it has committed are logged and returned as warnings, never
//! rolled back — `sweep_invalid` / `recalculate` self-heal later. Slot
//! exclusivity is decided by the store's partial unique index, so two
//! concurrent enrollments for the same (trainer, slot) resolve to exactly
//! one winner with no in-memory lock.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository::ledger_transaction::NewTransaction;
use crate::db::repository::revenue::NewRevenue;
use crate::db::repository::subscription::NewSubscription;
use crate::db::repository::{
    RepoError, ledger_transaction, member, membership, revenue, subscription, trainer,
};
use crate::services::{allocator, money, reconciliation};
use crate::utils::{AppError, AppResult, time};
use shared::models::{Membership, Subscription, SubscriptionCreate, SubscriptionUpdate};
use shared::types::{ScheduleSlot, SubscriptionStatus, TransactionKind};

/// Mutation result: the authoritative row plus best-effort bookkeeping
/// warnings (partial success, never a rollback).
#[derive(Debug, serde::Serialize)]
pub struct SubscriptionOutcome {
    pub subscription: Subscription,
    pub warnings: Vec<String>,
}

/// Expiry sweep result.
#[derive(Debug, Default, serde::Serialize)]
pub struct ExpiryRun {
    pub expired: u64,
    pub warnings: Vec<String>,
}

/// Enroll a member under a plan.
///
/// Trainer derivation order: explicit request > auto-assignment when the
/// plan requires a trainer (preset trainer first). When auto-assignment
/// cannot resolve, the subscription is still created trainerless — a
/// logged warning, not a hard failure.
pub async fn create(pool: &SqlitePool, payload: SubscriptionCreate) -> AppResult<SubscriptionOutcome> {
    let member = member::find_by_id(pool, payload.member_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {}", payload.member_id)))?;
    if member.status != "Active" {
        return Err(AppError::business_rule(format!(
            "Member {} is {}; only Active members can enroll",
            member.id, member.status
        )));
    }
    let plan = membership::find_by_id(pool, payload.membership_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Membership {}", payload.membership_id)))?;
    if !plan.is_active {
        return Err(AppError::business_rule(format!(
            "Membership {} is no longer offered",
            plan.id
        )));
    }
    if plan.gym_id != member.gym_id {
        return Err(AppError::validation(format!(
            "Membership {} belongs to a different gym than member {}",
            plan.id, member.id
        )));
    }

    let mut warnings = Vec::new();
    let (trainer_id, schedule_slot) =
        derive_assignment(pool, &plan, payload.trainer_id, payload.schedule_slot, &mut warnings)
            .await?;

    let start_date = match payload.start_date {
        Some(d) => {
            time::parse_date(&d)?;
            d
        }
        None => time::today_string(),
    };
    let end_date = match payload.end_date {
        Some(d) => {
            time::parse_date(&d)?;
            d
        }
        None => {
            let start = time::parse_date(&start_date)?;
            time::format_date(time::add_months(start, plan.duration_months as u32))
        }
    };
    if end_date <= start_date {
        return Err(AppError::validation(format!(
            "end_date {end_date} must be after start_date {start_date}"
        )));
    }

    let sub = subscription::create(
        pool,
        NewSubscription {
            gym_id: member.gym_id,
            member_id: member.id,
            membership_id: plan.id,
            trainer_id,
            schedule_slot: schedule_slot.clone(),
            start_date,
            end_date,
        },
    )
    .await
    .map_err(|e| slot_conflict(e, trainer_id, schedule_slot.as_deref()))?;

    info!(
        subscription_id = sub.id,
        member_id = member.id,
        membership_id = plan.id,
        trainer_id = ?sub.trainer_id,
        "Subscription created"
    );

    // Revenue: back-link an onboarding payment recorded before the
    // subscription existed, else record a fresh one at plan price.
    match revenue::back_link_unlinked(pool, member.id, plan.id, sub.id).await {
        Ok(true) => {}
        Ok(false) => {
            record_revenue(pool, &sub, plan.price, &mut warnings).await;
        }
        Err(e) => {
            warn!(subscription_id = sub.id, error = %e, "Revenue back-link failed");
            warnings.push(format!("Revenue bookkeeping failed: {e}"));
        }
    }

    warnings
        .extend(reconciliation::on_assignment_changed(pool, sub.gym_id, None, sub.trainer_id).await);

    Ok(SubscriptionOutcome {
        subscription: sub,
        warnings,
    })
}

/// Apply a partial update, dispatching in order: terminal status change,
/// plan change, renewal, explicit trainer change.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    payload: SubscriptionUpdate,
) -> AppResult<SubscriptionOutcome> {
    let sub = subscription::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {id}")))?;

    if let Some(target) = payload.status {
        if payload.membership_id.is_some()
            || payload.end_date.is_some()
            || payload.trainer_id.is_some()
            || payload.remove_trainer
        {
            return Err(AppError::validation(
                "A status change cannot be combined with other subscription fields",
            ));
        }
        return terminate(pool, sub, target).await;
    }

    if sub.status() != Some(SubscriptionStatus::Active) {
        return Err(AppError::business_rule(format!(
            "Subscription {id} is {}; terminal subscriptions accept no further changes",
            sub.status
        )));
    }

    let mut warnings = Vec::new();
    let mut plan_changed = false;

    if let Some(new_membership_id) = payload.membership_id
        && new_membership_id != sub.membership_id
    {
        change_plan(pool, &sub, new_membership_id, &payload, &mut warnings).await?;
        plan_changed = true;
    }

    if let Some(ref end_date) = payload.end_date {
        time::parse_date(end_date)?;
        if *end_date <= sub.start_date {
            return Err(AppError::validation(format!(
                "end_date {end_date} must be after start_date {}",
                sub.start_date
            )));
        }
        subscription::extend_end_date(pool, id, end_date).await?;
        // Renewal ledger rows only when the plan itself did not change —
        // a plan change already recorded its own Upgrade delta.
        if !plan_changed {
            renew_ledger(pool, &sub, &mut warnings).await;
        }
    }

    if !plan_changed {
        if payload.remove_trainer {
            subscription::reassign(pool, id, None, None).await?;
            info!(subscription_id = id, old_trainer = ?sub.trainer_id, "Trainer unassigned");
            warnings.extend(
                reconciliation::on_assignment_changed(pool, sub.gym_id, sub.trainer_id, None).await,
            );
        } else if let Some(new_trainer) = payload.trainer_id {
            reassign_trainer(pool, &sub, new_trainer, payload.schedule_slot, &mut warnings).await?;
        }
    }

    let refreshed = subscription::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {id}")))?;
    Ok(SubscriptionOutcome {
        subscription: refreshed,
        warnings,
    })
}

/// Delete a subscription: cancel open sessions, remove linked ledger
/// rows, delete the row, then recalculate its trainer's compensation.
pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<Vec<String>> {
    let sub = subscription::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {id}")))?;

    let mut warnings =
        reconciliation::on_subscription_terminating(pool, &sub, "subscription deleted").await;

    // Ledger cleanup is best-effort: an un-matchable legacy row must not
    // abort the delete.
    if let Err(e) =
        revenue::delete_for_subscription(pool, id, sub.member_id, sub.membership_id).await
    {
        warn!(subscription_id = id, error = %e, "Revenue cleanup failed");
        warnings.push(format!("Revenue cleanup failed: {e}"));
    }
    if let Err(e) = ledger_transaction::delete_for_subscription(pool, id).await {
        warn!(subscription_id = id, error = %e, "Transaction cleanup failed");
        warnings.push(format!("Transaction cleanup failed: {e}"));
    }

    subscription::delete(pool, id).await?;
    info!(subscription_id = id, "Subscription deleted");

    warnings
        .extend(reconciliation::on_assignment_changed(pool, sub.gym_id, sub.trainer_id, None).await);
    Ok(warnings)
}

/// Bulk-expire Active subscriptions past their end date.
///
/// Idempotent by construction: the CAS transition skips rows another
/// firing already terminated, and per-row failures degrade to warnings so
/// a retry can pick up the remainder.
pub async fn expire_subscriptions(pool: &SqlitePool) -> AppResult<ExpiryRun> {
    let today = time::today_string();
    let due = subscription::find_due_expiry(pool, &today).await?;
    let mut run = ExpiryRun::default();

    for sub in due {
        run.warnings
            .extend(reconciliation::on_subscription_terminating(pool, &sub, "subscription expired").await);
        match subscription::transition(pool, sub.id, SubscriptionStatus::Expired.as_str()).await {
            Ok(true) => {
                run.expired += 1;
                run.warnings.extend(
                    reconciliation::on_assignment_changed(pool, sub.gym_id, sub.trainer_id, None)
                        .await,
                );
            }
            Ok(false) => {} // lost the race to another firing; nothing left to do
            Err(e) => {
                warn!(subscription_id = sub.id, error = %e, "Expiry transition failed");
                run.warnings
                    .push(format!("Failed to expire subscription {}: {e}", sub.id));
            }
        }
    }
    if run.expired > 0 {
        info!(expired = run.expired, "Expiry sweep finished");
    }
    Ok(run)
}

// ── Internal steps ──────────────────────────────────────────────────

/// Resolve the (trainer, slot) pair for a plan.
///
/// An explicit trainer must come with a resolvable slot and is validated
/// strictly. Auto-assignment failures are soft: the enrollment proceeds
/// trainerless with a warning (no-waitlist policy).
async fn derive_assignment(
    pool: &SqlitePool,
    plan: &Membership,
    explicit_trainer: Option<i64>,
    explicit_slot: Option<ScheduleSlot>,
    warnings: &mut Vec<String>,
) -> AppResult<(Option<i64>, Option<String>)> {
    if let Some(trainer_id) = explicit_trainer {
        let slot = explicit_slot.or_else(|| plan.schedule_slot()).ok_or_else(|| {
            AppError::validation("schedule_slot is required when assigning a trainer")
        })?;
        let t = trainer::find_by_id(pool, trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trainer {trainer_id}")))?;
        if t.status != "Active" {
            return Err(AppError::business_rule(format!(
                "Trainer {trainer_id} is {}",
                t.status
            )));
        }
        if t.gym_id != plan.gym_id {
            return Err(AppError::validation(format!(
                "Trainer {trainer_id} belongs to a different gym"
            )));
        }
        return Ok((Some(trainer_id), Some(slot.as_str().to_string())));
    }

    if !plan.requires_trainer {
        return Ok((None, None));
    }

    let Some(slot) = explicit_slot.or_else(|| plan.schedule_slot()) else {
        warn!(membership_id = plan.id, "Plan requires a trainer but carries no schedule pattern");
        warnings.push(format!(
            "Membership {} requires a trainer but has no schedule pattern; created without a trainer",
            plan.id
        ));
        return Ok((None, None));
    };

    match allocator::pick_available(pool, plan.gym_id, slot, plan.preset_trainer_id).await? {
        Some(t) => Ok((Some(t.id), Some(slot.as_str().to_string()))),
        None => {
            warn!(gym_id = plan.gym_id, slot = %slot, "No trainer available; enrolling without one");
            warnings.push(format!(
                "No trainer available for slot {slot}; subscription created without a trainer"
            ));
            Ok((None, None))
        }
    }
}

/// Plan change: re-derive the assignment from the new plan, write the
/// swap, then record the cost delta (one signed transaction + one fresh
/// revenue for its absolute value; the original revenue stays untouched).
async fn change_plan(
    pool: &SqlitePool,
    sub: &Subscription,
    new_membership_id: i64,
    payload: &SubscriptionUpdate,
    warnings: &mut Vec<String>,
) -> AppResult<()> {
    let old_plan = membership::find_by_id(pool, sub.membership_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Membership {}", sub.membership_id)))?;
    let new_plan = membership::find_by_id(pool, new_membership_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Membership {new_membership_id}")))?;
    if !new_plan.is_active {
        return Err(AppError::business_rule(format!(
            "Membership {new_membership_id} is no longer offered"
        )));
    }
    if new_plan.gym_id != sub.gym_id {
        return Err(AppError::validation(format!(
            "Membership {new_membership_id} belongs to a different gym"
        )));
    }

    let (new_trainer, new_slot) =
        derive_assignment(pool, &new_plan, payload.trainer_id, payload.schedule_slot, warnings)
            .await?;
    subscription::change_membership(pool, sub.id, new_membership_id, new_trainer, new_slot.as_deref())
        .await
        .map_err(|e| slot_conflict(e, new_trainer, new_slot.as_deref()))?;

    let delta = money::cost_delta(new_plan.price, old_plan.price);
    info!(
        subscription_id = sub.id,
        old_membership = old_plan.id,
        new_membership = new_plan.id,
        cost_delta = delta,
        "Subscription plan changed"
    );

    record_transaction(
        pool,
        sub,
        TransactionKind::Upgrade,
        delta,
        format!("Plan change: {} → {}", old_plan.name, new_plan.name),
        warnings,
    )
    .await;
    record_revenue(pool, sub, delta.abs(), warnings).await;

    warnings.extend(
        reconciliation::on_assignment_changed(pool, sub.gym_id, sub.trainer_id, new_trainer).await,
    );
    Ok(())
}

/// Renewal ledger rows: one Renewal transaction and one fresh revenue,
/// both at the current plan price.
async fn renew_ledger(pool: &SqlitePool, sub: &Subscription, warnings: &mut Vec<String>) {
    let plan = match membership::find_by_id(pool, sub.membership_id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            warnings.push(format!(
                "Membership {} missing; renewal ledger rows skipped",
                sub.membership_id
            ));
            return;
        }
        Err(e) => {
            warnings.push(format!("Renewal bookkeeping failed: {e}"));
            return;
        }
    };
    info!(subscription_id = sub.id, price = plan.price, "Subscription renewed");
    record_transaction(
        pool,
        sub,
        TransactionKind::Renewal,
        plan.price,
        format!("Renewal of {}", plan.name),
        warnings,
    )
    .await;
    record_revenue(pool, sub, plan.price, warnings).await;
}

/// Explicit trainer change on an otherwise unchanged subscription.
async fn reassign_trainer(
    pool: &SqlitePool,
    sub: &Subscription,
    new_trainer: i64,
    requested_slot: Option<ScheduleSlot>,
    warnings: &mut Vec<String>,
) -> AppResult<()> {
    let slot = match requested_slot {
        Some(s) => s,
        None => sub
            .schedule_slot()
            .ok_or_else(|| AppError::validation("schedule_slot is required when assigning a trainer"))?,
    };
    let t = trainer::find_by_id(pool, new_trainer)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Trainer {new_trainer}")))?;
    if t.status != "Active" {
        return Err(AppError::business_rule(format!("Trainer {new_trainer} is {}", t.status)));
    }
    if t.gym_id != sub.gym_id {
        return Err(AppError::validation(format!(
            "Trainer {new_trainer} belongs to a different gym"
        )));
    }

    subscription::reassign(pool, sub.id, Some(new_trainer), Some(slot.as_str()))
        .await
        .map_err(|e| slot_conflict(e, Some(new_trainer), Some(slot.as_str())))?;
    info!(
        subscription_id = sub.id,
        old_trainer = ?sub.trainer_id,
        new_trainer,
        slot = %slot,
        "Trainer reassigned"
    );

    warnings.extend(
        reconciliation::on_assignment_changed(pool, sub.gym_id, sub.trainer_id, Some(new_trainer))
            .await,
    );
    Ok(())
}

/// Terminal transition: cancel open sessions first, then CAS the status.
/// Losing the CAS to a concurrent handler means the work is already done.
async fn terminate(
    pool: &SqlitePool,
    sub: Subscription,
    target: SubscriptionStatus,
) -> AppResult<SubscriptionOutcome> {
    if !target.is_terminal() {
        return Err(AppError::validation(
            "A subscription status can only change to Cancelled or Expired",
        ));
    }

    let reason = format!("subscription {}", target.as_str().to_lowercase());
    let mut warnings = reconciliation::on_subscription_terminating(pool, &sub, &reason).await;

    let transitioned = subscription::transition(pool, sub.id, target.as_str()).await?;
    if transitioned {
        info!(subscription_id = sub.id, status = target.as_str(), "Subscription terminated");
        warnings.extend(
            reconciliation::on_assignment_changed(pool, sub.gym_id, sub.trainer_id, None).await,
        );
    }

    let refreshed = subscription::find_by_id(pool, sub.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {}", sub.id)))?;
    Ok(SubscriptionOutcome {
        subscription: refreshed,
        warnings,
    })
}

async fn record_transaction(
    pool: &SqlitePool,
    sub: &Subscription,
    kind: TransactionKind,
    amount: f64,
    note: String,
    warnings: &mut Vec<String>,
) {
    let result = ledger_transaction::create(
        pool,
        NewTransaction {
            gym_id: sub.gym_id,
            subscription_id: sub.id,
            amount,
            kind: kind.as_str().into(),
            note: Some(note),
        },
    )
    .await;
    if let Err(e) = result {
        warn!(subscription_id = sub.id, error = %e, "Transaction bookkeeping failed");
        warnings.push(format!("Transaction bookkeeping failed: {e}"));
    }
}

async fn record_revenue(pool: &SqlitePool, sub: &Subscription, amount: f64, warnings: &mut Vec<String>) {
    let result = revenue::create(
        pool,
        NewRevenue {
            gym_id: sub.gym_id,
            member_id: sub.member_id,
            membership_id: sub.membership_id,
            subscription_id: Some(sub.id),
            amount,
            revenue_date: time::today_string(),
        },
    )
    .await;
    if let Err(e) = result {
        warn!(subscription_id = sub.id, error = %e, "Revenue bookkeeping failed");
        warnings.push(format!("Revenue bookkeeping failed: {e}"));
    }
}

fn slot_conflict(err: RepoError, trainer_id: Option<i64>, slot: Option<&str>) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::conflict(format!(
            "Trainer {} already holds an active subscription for slot {}",
            trainer_id.map_or_else(|| "?".into(), |t| t.to_string()),
            slot.unwrap_or("?")
        )),
        other => other.into(),
    }
}
