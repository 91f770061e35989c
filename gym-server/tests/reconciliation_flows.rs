//! Reconciliation flows: renewal vs upgrade dispatch, revenue
//! back-linking, capacity release, expiry sweep idempotency and the
//! full-gym payroll run.

mod common;

use chrono::Datelike;
use common::*;
use gym_server::db::repository::expense::NewSalaryRow;
use gym_server::db::repository::revenue::NewRevenue;
use gym_server::db::repository::{expense, ledger_transaction, revenue};
use gym_server::services::{allocator, compensation, sessions, subscriptions};
use gym_server::utils::AppError;
use gym_server::utils::time::{current_period, period_range};
use shared::models::{SubscriptionCreate, SubscriptionUpdate};
use shared::types::ScheduleSlot;

#[tokio::test]
async fn renewal_records_price_and_fresh_revenue() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let plan = seed_plan(&pool, gym_id, "Basic", 300_000.0, false, None).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;

    let new_end = {
        let end = chrono::NaiveDate::parse_from_str(&sub.end_date, "%Y-%m-%d").expect("date");
        (end + chrono::Months::new(1)).format("%Y-%m-%d").to_string()
    };
    subscriptions::update(
        &pool,
        sub.id,
        SubscriptionUpdate {
            end_date: Some(new_end.clone()),
            ..Default::default()
        },
    )
    .await
    .expect("renew");

    let txns = ledger_transaction::list(&pool, Some(sub.id)).await.expect("list");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].kind, "Renewal");
    assert_eq!(txns[0].amount, 300_000.0);

    let revenues = revenue::list(&pool, Some(gym_id), None).await.expect("list");
    // enrollment revenue + renewal revenue
    assert_eq!(revenues.len(), 2);
    assert!(revenues.iter().all(|r| r.amount == 300_000.0));
}

#[tokio::test]
async fn enrollment_back_links_an_onboarding_revenue() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let plan = seed_plan(&pool, gym_id, "Basic", 300_000.0, false, None).await;
    let member = seed_member(&pool, gym_id, "Ana").await;

    // Payment recorded during onboarding, before any subscription exists.
    let onboarding = revenue::create(
        &pool,
        NewRevenue {
            gym_id,
            member_id: member,
            membership_id: plan,
            subscription_id: None,
            amount: 300_000.0,
            revenue_date: today(),
        },
    )
    .await
    .expect("onboarding revenue");

    let sub = enroll(&pool, member, plan).await;

    let revenues = revenue::list(&pool, Some(gym_id), Some(member)).await.expect("list");
    assert_eq!(revenues.len(), 1, "back-link instead of a duplicate row");
    assert_eq!(revenues[0].id, onboarding.id);
    assert_eq!(revenues[0].subscription_id, Some(sub.id));
}

#[tokio::test]
async fn cancelling_frees_the_trainer_slot() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let trainer_id = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT 2-4-6", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;
    assert_eq!(sub.trainer_id, Some(trainer_id));

    let free = allocator::find_available(&pool, gym_id, ScheduleSlot::MonWedFri).await.expect("query");
    assert!(free.is_empty(), "slot occupied");
    let other = allocator::find_available(&pool, gym_id, ScheduleSlot::TueThuSat).await.expect("query");
    assert_eq!(other.len(), 1, "the other pattern is a separate capacity unit");

    subscriptions::update(
        &pool,
        sub.id,
        SubscriptionUpdate {
            status: Some(shared::types::SubscriptionStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
    .expect("cancel");

    let free = allocator::find_available(&pool, gym_id, ScheduleSlot::MonWedFri).await.expect("query");
    assert_eq!(free.len(), 1, "cancellation releases the capacity unit");
}

#[tokio::test]
async fn expiry_sweep_is_idempotent_and_cancels_open_sessions() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let trainer_id = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT 2-4-6", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;

    // Already past its end date at creation time.
    let sub = subscriptions::create(
        &pool,
        SubscriptionCreate {
            member_id: member,
            membership_id: plan,
            trainer_id: Some(trainer_id),
            schedule_slot: Some(ScheduleSlot::MonWedFri),
            start_date: Some(days_ago(40)),
            end_date: Some(days_ago(5)),
        },
    )
    .await
    .expect("enroll in the past")
    .subscription;
    sessions::complete(&pool, sub.id, &days_ago(10), None).await.expect("session");

    let first = subscriptions::expire_subscriptions(&pool).await.expect("sweep");
    assert_eq!(first.expired, 1);

    let fees = expense::list(&pool, Some(gym_id), None, Some("SessionFee"), None, None)
        .await
        .expect("list");
    assert_eq!(fees.len(), 1);
    assert_eq!(fees[0].status, "Cancelled");

    // Double-fire: the external trigger may retry.
    let second = subscriptions::expire_subscriptions(&pool).await.expect("sweep again");
    assert_eq!(second.expired, 0);
}

#[tokio::test]
async fn payroll_run_sweeps_stale_rows_and_rebuilds_valid_ones() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let staffed = seed_trainer(&pool, gym_id, "Coach Wu", Some(5_000_000.0)).await;
    let idle = seed_trainer(&pool, gym_id, "Coach Idle", Some(4_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT 2-4-6", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    enroll(&pool, member, plan).await;

    let period = current_period();
    let (from, to) = period_range(&period).expect("period");

    // A stale generated row for a trainer with no qualifying assignment.
    expense::replace_salary_rows(
        &pool,
        idle,
        &from,
        &to,
        Some(NewSalaryRow {
            gym_id,
            amount: 4_000_000.0,
            expense_date: from.clone(),
            notes: "Salary".into(),
        }),
    )
    .await
    .expect("stale row");

    let run = compensation::recalculate_all(&pool, gym_id, &period, false).await.expect("run");
    assert_eq!(run.swept, 1, "idle trainer's row swept");
    assert_eq!(run.recalculated, 2);
    assert!(run.warnings.is_empty());

    assert_eq!(
        expense::list_salary_rows(&pool, staffed, &from, &to).await.expect("list").len(),
        1
    );
    assert!(expense::list_salary_rows(&pool, idle, &from, &to).await.expect("list").is_empty());

    // cleanup-only mode stops after the sweep and must not disturb the
    // valid row.
    let cleanup = compensation::recalculate_all(&pool, gym_id, &period, true).await.expect("cleanup");
    assert_eq!(cleanup.recalculated, 0);
    assert_eq!(
        expense::list_salary_rows(&pool, staffed, &from, &to).await.expect("list").len(),
        1
    );
}

#[tokio::test]
async fn session_summary_tracks_quota() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    seed_trainer(&pool, gym_id, "Coach Wu", Some(6_000_000.0)).await;
    let plan = seed_plan(&pool, gym_id, "PT 2-4-6", 300_000.0, true, Some(ScheduleSlot::MonWedFri)).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;

    let date = today();
    sessions::complete(&pool, sub.id, &date, None).await.expect("complete");
    sessions::cancel(&pool, sub.id, &date, "front-desk", "rescheduled").await.expect("cancel");
    sessions::complete(&pool, sub.id, &date, None).await.expect("re-complete after cancel");

    let now = chrono::Utc::now().date_naive();
    let summary = sessions::summary(&pool, sub.id, now.month(), now.year()).await.expect("summary");
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.remaining, summary.quota - 1);
}

#[tokio::test]
async fn completing_without_a_trainer_is_a_business_rule_error() {
    let pool = memory_pool().await;
    let gym_id = seed_gym(&pool).await;
    let plan = seed_plan(&pool, gym_id, "Basic", 300_000.0, false, None).await;
    let member = seed_member(&pool, gym_id, "Ana").await;
    let sub = enroll(&pool, member, plan).await;

    let err = sessions::complete(&pool, sub.id, &today(), None)
        .await
        .expect_err("no trainer assigned");
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
}
