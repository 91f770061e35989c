//! Revenue Model

use serde::{Deserialize, Serialize};

/// Ledger revenue row.
///
/// `subscription_id` is nullable: onboarding may record the payment before
/// the subscription exists, and enrollment back-links the row instead of
/// writing a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Revenue {
    pub id: i64,
    pub gym_id: i64,
    pub member_id: i64,
    pub membership_id: i64,
    pub subscription_id: Option<i64>,
    pub amount: f64,
    pub revenue_date: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Manual revenue payload (onboarding payments recorded ahead of enrollment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueCreate {
    pub gym_id: i64,
    pub member_id: i64,
    pub membership_id: i64,
    pub amount: f64,
    pub revenue_date: Option<String>,
}
