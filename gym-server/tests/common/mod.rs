//! Shared test fixtures
//!
//! In-memory SQLite pool with the real migrations applied, plus small
//! seeding helpers over the repository layer.

#![allow(dead_code)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use gym_server::db::DbService;
use gym_server::db::repository::{gym, member, membership, trainer};
use gym_server::services::subscriptions;
use shared::models::{
    GymCreate, MemberCreate, MembershipCreate, Subscription, SubscriptionCreate, TrainerCreate,
};
use shared::types::ScheduleSlot;

pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    DbService::migrate(&pool).await.expect("apply migrations");
    pool
}

pub async fn seed_gym(pool: &SqlitePool) -> i64 {
    gym::create(
        pool,
        GymCreate {
            name: "Iron Temple".into(),
            address: None,
        },
    )
    .await
    .expect("seed gym")
    .id
}

pub async fn seed_member(pool: &SqlitePool, gym_id: i64, name: &str) -> i64 {
    member::create(
        pool,
        MemberCreate {
            gym_id,
            name: name.into(),
            phone: None,
            email: None,
        },
    )
    .await
    .expect("seed member")
    .id
}

pub async fn seed_trainer(pool: &SqlitePool, gym_id: i64, name: &str, salary: Option<f64>) -> i64 {
    trainer::create(
        pool,
        TrainerCreate {
            gym_id,
            name: name.into(),
            phone: None,
            salary,
        },
    )
    .await
    .expect("seed trainer")
    .id
}

pub async fn seed_plan(
    pool: &SqlitePool,
    gym_id: i64,
    name: &str,
    price: f64,
    requires_trainer: bool,
    schedule_slot: Option<ScheduleSlot>,
) -> i64 {
    membership::create(
        pool,
        MembershipCreate {
            gym_id,
            name: name.into(),
            price,
            duration_months: 1,
            schedule_slot,
            requires_trainer,
            preset_trainer_id: None,
        },
    )
    .await
    .expect("seed membership")
    .id
}

/// Enroll with server-side defaults (start today, end per plan duration).
pub async fn enroll(pool: &SqlitePool, member_id: i64, membership_id: i64) -> Subscription {
    subscriptions::create(
        pool,
        SubscriptionCreate {
            member_id,
            membership_id,
            trainer_id: None,
            schedule_slot: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .expect("enroll")
    .subscription
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn days_ago(n: u64) -> String {
    (chrono::Utc::now().date_naive() - chrono::Days::new(n))
        .format("%Y-%m-%d")
        .to_string()
}
