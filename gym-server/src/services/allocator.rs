//! Trainer Capacity Allocator
//!
//! Each trainer has exactly two capacity units — one per schedule pattern
//! — and may hold at most one Active, non-expired subscription per
//! pattern. Availability is a single SQL anti-join; an empty result means
//! "no trainer", never a queue or waitlist.
//!
//! The answer is advisory: the partial unique index on
//! `(trainer_id, schedule_slot)` is what actually decides a race between
//! two concurrent enrollments.

use sqlx::SqlitePool;

use crate::db::repository::trainer;
use crate::utils::{AppResult, time};
use shared::models::Trainer;
use shared::types::ScheduleSlot;

/// All Active trainers in the gym with a free capacity unit for the slot.
pub async fn find_available(
    pool: &SqlitePool,
    gym_id: i64,
    slot: ScheduleSlot,
) -> AppResult<Vec<Trainer>> {
    let today = time::today_string();
    Ok(trainer::find_available(pool, gym_id, slot, &today).await?)
}

/// Pick one trainer for auto-assignment.
///
/// The plan's preset trainer wins when it still has the slot free;
/// otherwise the longest-registered available trainer. `None` when the
/// gym has no capacity left for this pattern.
pub async fn pick_available(
    pool: &SqlitePool,
    gym_id: i64,
    slot: ScheduleSlot,
    preset_trainer_id: Option<i64>,
) -> AppResult<Option<Trainer>> {
    let mut candidates = find_available(pool, gym_id, slot).await?;
    if let Some(preset) = preset_trainer_id
        && let Some(pos) = candidates.iter().position(|t| t.id == preset)
    {
        return Ok(Some(candidates.swap_remove(pos)));
    }
    Ok(candidates.into_iter().next())
}
