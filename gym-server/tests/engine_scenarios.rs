//! End-to-end engine scenarios over an in-memory store: slot
//! exclusivity, session idempotency, compensation reconciliation and the
//! upgrade ledger trail.

mod common;

use common::*;
use gym_server::db::repository::{expense, ledger_transaction, revenue, subscription};
use gym_server::services::{compensation, sessions, subscriptions};
use gym_server::utils::AppError;
use gym_server::utils::time::{current_period, period_range};
use shared::models::{SubscriptionCreate, SubscriptionUpdate};
use shared::types::{ScheduleSlot, SubscriptionStatus};

#[tokio::test]
async fn slot_exclusivity_one_active_holder_per_trainer_slot() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let trainer_id = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT Monthly", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;

    let m1 = seed_member(&pool, gym_id, "Ana").await;
    let first = enroll(&pool, m1, plan).await;
    assert_eq!(first.trainer_id, Some(trainer_id));
    assert_eq!(first.schedule_slot.as_deref(), Some("2-4-6"));

    // Auto-assignment finds no capacity left: enrollment proceeds
    // trainerless with a warning, never a hard failure.
    let m2 = seed_member(&pool, gym_id, "Ben").await;
    let second = subscriptions::create(
        &pool,
        SubscriptionCreate {
            member_id: m2,
            membership_id: plan,
            trainer_id: None,
            schedule_slot: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .expect("trainerless enrollment");
    assert_eq!(second.subscription.trainer_id, None);
    assert!(!second.warnings.is_empty());

    // An explicit claim on the occupied slot is a Conflict.
    let m3 = seed_member(&pool, gym_id, "Cleo").await;
    let err = subscriptions::create(
        &pool,
        SubscriptionCreate {
            member_id: m3,
            membership_id: plan,
            trainer_id: Some(trainer_id),
            schedule_slot: Some(ScheduleSlot::MonWedFri),
            start_date: None,
            end_date: None,
        },
    )
    .await
    .expect_err("occupied slot must conflict");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // The other pattern is a separate capacity unit of the same trainer.
    let other = subscriptions::create(
        &pool,
        SubscriptionCreate {
            member_id: m3,
            membership_id: plan,
            trainer_id: Some(trainer_id),
            schedule_slot: Some(ScheduleSlot::TueThuSat),
            start_date: None,
            end_date: None,
        },
    )
    .await
    .expect("second pattern is free");
    assert_eq!(other.subscription.schedule_slot.as_deref(), Some("3-5-7"));
}

#[tokio::test]
async fn completing_a_session_twice_conflicts_with_one_live_row() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    seed_trainer(&pool, gym_id, "Coach Wu", Some(6_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT Monthly", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;

    let date = today();
    let row = sessions::complete(&pool, sub.id, &date, None).await.expect("first completion");
    assert_eq!(row.status, "Pending");
    // salary 6M / 12 sessions with a known schedule
    assert_eq!(row.amount, 500_000.0);

    let err = sessions::complete(&pool, sub.id, &date, None)
        .await
        .expect_err("second completion must conflict");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let live = expense::find_live_session(&pool, sub.id, &date)
        .await
        .expect("query")
        .expect("one live row");
    assert_eq!(live.id, row.id);
}

#[tokio::test]
async fn cancelling_a_never_completed_session_is_a_noop() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    seed_trainer(&pool, gym_id, "Coach Wu", Some(6_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT Monthly", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;

    let cancelled = sessions::cancel(&pool, sub.id, &today(), "front-desk", "member sick")
        .await
        .expect("cancel is a no-op, not an error");
    assert!(!cancelled);

    let rows = expense::list(&pool, Some(gym_id), None, Some("SessionFee"), None, None)
        .await
        .expect("list");
    assert!(rows.is_empty(), "no row may be created by a no-op cancel");
}

#[tokio::test]
async fn recalculate_is_idempotent() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let trainer_id = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT Monthly", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    enroll(&pool, member, plan).await;

    let period = current_period();
    compensation::recalculate(&pool, trainer_id, gym_id, &period).await.expect("first run");
    compensation::recalculate(&pool, trainer_id, gym_id, &period).await.expect("second run");

    let (from, to) = period_range(&period).expect("period");
    let rows = expense::list_salary_rows(&pool, trainer_id, &from, &to).await.expect("list");
    assert_eq!(rows.len(), 1, "exactly one salary row per trainer per period");
    assert_eq!(rows[0].amount, 5_000_000.0);
    assert!(rows[0].notes.as_deref().unwrap_or("").contains("Ana"));
}

#[tokio::test]
async fn deleting_a_subscription_cancels_sessions_and_reconciles() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let trainer_id = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT Monthly", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;

    for date in [days_ago(2), days_ago(1), today()] {
        sessions::complete(&pool, sub.id, &date, None).await.expect("complete");
    }

    let warnings = subscriptions::delete(&pool, sub.id).await.expect("delete");
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    assert!(
        subscription::find_by_id(&pool, sub.id).await.expect("query").is_none(),
        "subscription row removed"
    );

    let fees = expense::list(&pool, Some(gym_id), None, Some("SessionFee"), None, None)
        .await
        .expect("list");
    assert_eq!(fees.len(), 3);
    assert!(fees.iter().all(|e| e.status == "Cancelled"), "all three sessions cancelled");

    // 0 active members left: the salary row is gone.
    let (from, to) = period_range(&current_period()).expect("period");
    let salary = expense::list_salary_rows(&pool, trainer_id, &from, &to).await.expect("list");
    assert!(salary.is_empty());
}

#[tokio::test]
async fn cancelling_the_only_assignment_removes_the_salary_expense() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let trainer_id = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT 2-4-6", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Mia").await;
    let sub = enroll(&pool, member, plan).await;
    assert_eq!(sub.trainer_id, Some(trainer_id));

    let period = current_period();
    compensation::recalculate(&pool, trainer_id, gym_id, &period).await.expect("recalculate");
    let (from, to) = period_range(&period).expect("period");
    let rows = expense::list_salary_rows(&pool, trainer_id, &from, &to).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 5_000_000.0);

    let outcome = subscriptions::update(
        &pool,
        sub.id,
        SubscriptionUpdate {
            status: Some(SubscriptionStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
    .expect("cancel subscription");
    assert_eq!(outcome.subscription.status, "Cancelled");

    let rows = expense::list_salary_rows(&pool, trainer_id, &from, &to).await.expect("list");
    assert!(rows.is_empty(), "0 active members leaves no salary row");
}

#[tokio::test]
async fn upgrade_records_delta_without_touching_the_original_revenue() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let plan_a = seed_plan(&pool, gym_id, "Basic", 300_000.0, false, None).await;
    let plan_b = seed_plan(&pool, gym_id, "Premium", 800_000.0, false, None).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan_a).await;

    let original = revenue::list(&pool, Some(gym_id), None).await.expect("list");
    assert_eq!(original.len(), 1);
    assert_eq!(original[0].amount, 300_000.0);
    let original_id = original[0].id;

    subscriptions::update(
        &pool,
        sub.id,
        SubscriptionUpdate {
            membership_id: Some(plan_b),
            ..Default::default()
        },
    )
    .await
    .expect("upgrade");

    let txns = ledger_transaction::list(&pool, Some(sub.id)).await.expect("list");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].kind, "Upgrade");
    assert_eq!(txns[0].amount, 500_000.0);

    let revenues = revenue::list(&pool, Some(gym_id), None).await.expect("list");
    assert_eq!(revenues.len(), 2);
    let kept = revenues.iter().find(|r| r.id == original_id).expect("original row kept");
    assert_eq!(kept.amount, 300_000.0);
    assert!(revenues.iter().any(|r| r.amount == 500_000.0), "fresh delta revenue");
}
