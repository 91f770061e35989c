//! Membership Model (plan template)

use serde::{Deserialize, Serialize};

use crate::types::ScheduleSlot;

/// Membership plan template.
///
/// A plan that `requires_trainer` carries the schedule pattern its
/// sessions run on, and optionally a preset trainer; enrollment uses both
/// to derive the subscription's trainer assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Membership {
    pub id: i64,
    pub gym_id: i64,
    pub name: String,
    pub price: f64,
    pub duration_months: i64,
    pub schedule_slot: Option<String>,
    pub requires_trainer: bool,
    pub preset_trainer_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Membership {
    pub fn schedule_slot(&self) -> Option<ScheduleSlot> {
        self.schedule_slot.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipCreate {
    pub gym_id: i64,
    pub name: String,
    pub price: f64,
    pub duration_months: i64,
    pub schedule_slot: Option<ScheduleSlot>,
    #[serde(default)]
    pub requires_trainer: bool,
    pub preset_trainer_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration_months: Option<i64>,
    pub schedule_slot: Option<ScheduleSlot>,
    pub requires_trainer: Option<bool>,
    pub preset_trainer_id: Option<i64>,
    pub is_active: Option<bool>,
}
