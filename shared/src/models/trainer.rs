//! Trainer Model

use serde::{Deserialize, Serialize};

/// Personal trainer entity (私教)
///
/// `salary` is the full monthly payout used by compensation recalculation;
/// NULL means the trainer is paid outside the system and never receives
/// a generated salary expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Trainer {
    pub id: i64,
    pub gym_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub salary: Option<f64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerCreate {
    pub gym_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub salary: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub salary: Option<f64>,
    pub status: Option<String>,
}
