//! Ledger Transaction Model

use serde::{Deserialize, Serialize};

/// Signed ledger delta tied to a subscription.
///
/// Written on plan upgrades (`amount = new price − old price`, may be
/// negative) and renewals (`amount = plan price`). Prior revenue rows are
/// never mutated; the transaction carries the adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerTransaction {
    pub id: i64,
    pub gym_id: i64,
    pub subscription_id: i64,
    pub amount: f64,
    pub kind: String,
    pub note: Option<String>,
    pub created_at: i64,
}
