//! Expense Model

use serde::{Deserialize, Serialize};

use crate::types::{ExpenseStatus, ExpenseType, Provenance};

/// Ledger expense row.
///
/// Two derived shapes share this table:
/// - `TrainerSalary` rows — one per trainer per period, written only by
///   compensation recalculation (`provenance = SystemAuto`);
/// - `SessionFee` rows — one per completed session, identified by the
///   `(subscription_id, session_date)` key. At most one non-Cancelled row
///   may exist per key (partial unique index).
///
/// Manual rows (`Equipment` / `Other`) are ordinary bookkeeping and never
/// touched by sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub gym_id: i64,
    pub expense_type: String,
    pub category: String,
    pub amount: f64,
    pub expense_date: String,
    pub status: String,
    pub trainer_id: Option<i64>,
    pub equipment_id: Option<i64>,
    pub subscription_id: Option<i64>,
    pub session_date: Option<String>,
    pub provenance: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Expense {
    pub fn expense_type(&self) -> Option<ExpenseType> {
        self.expense_type.parse().ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ExpenseStatus::Cancelled.as_str()
    }

    pub fn is_paid(&self) -> bool {
        self.status == ExpenseStatus::Paid.as_str()
    }

    pub fn is_system(&self) -> bool {
        self.provenance == Provenance::SystemAuto.as_str()
    }
}

/// Manual expense payload (operator bookkeeping; the engine writes its own
/// rows directly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub gym_id: i64,
    pub expense_type: ExpenseType,
    pub category: Option<String>,
    pub amount: f64,
    pub expense_date: Option<String>,
    pub trainer_id: Option<i64>,
    pub equipment_id: Option<i64>,
    pub notes: Option<String>,
}
