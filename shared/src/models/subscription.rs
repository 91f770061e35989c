//! Subscription Model

use serde::{Deserialize, Serialize};

use crate::types::{ScheduleSlot, SubscriptionStatus};

/// A member's enrollment under a membership plan.
///
/// Invariants (enforced by the store, not by callers):
/// - `trainer_id` set ⇒ `schedule_slot` set (CHECK constraint);
/// - among Active rows, `(trainer_id, schedule_slot)` is unique
///   (partial unique index).
///
/// `Active → Cancelled` and `Active → Expired` are the only transitions;
/// both targets are terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subscription {
    pub id: i64,
    pub gym_id: i64,
    pub member_id: i64,
    pub membership_id: i64,
    pub trainer_id: Option<i64>,
    pub schedule_slot: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Subscription {
    pub fn schedule_slot(&self) -> Option<ScheduleSlot> {
        self.schedule_slot.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn status(&self) -> Option<SubscriptionStatus> {
        self.status.parse().ok()
    }
}

/// Enrollment payload.
///
/// `trainer_id`/`schedule_slot` are optional; when the plan requires a
/// trainer and none is given, the server attempts auto-assignment.
/// `start_date` defaults to today; `end_date` defaults to start plus the
/// plan's `duration_months`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCreate {
    pub member_id: i64,
    pub membership_id: i64,
    pub trainer_id: Option<i64>,
    pub schedule_slot: Option<ScheduleSlot>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Partial update payload.
///
/// `remove_trainer: true` is the explicit "unassign" signal — a plain
/// absent `trainer_id` means "leave as is", so removal needs its own flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub membership_id: Option<i64>,
    pub end_date: Option<String>,
    pub trainer_id: Option<i64>,
    pub schedule_slot: Option<ScheduleSlot>,
    #[serde(default)]
    pub remove_trainer: bool,
    pub status: Option<SubscriptionStatus>,
}
