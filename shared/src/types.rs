//! Domain enums
//!
//! Status and category values are stored as TEXT in SQLite and travel as
//! plain strings through the API; these enums are the single place the
//! accepted literals live. Repository rows keep `String` fields (same as
//! the rest of the models) and services parse via [`std::str::FromStr`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weekly training pattern a trainer can be booked against.
///
/// Exactly two fixed patterns exist: Mon/Wed/Fri ("2-4-6") and
/// Tue/Thu/Sat ("3-5-7"). Each trainer has one capacity unit per pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleSlot {
    #[serde(rename = "2-4-6")]
    MonWedFri,
    #[serde(rename = "3-5-7")]
    TueThuSat,
}

impl ScheduleSlot {
    pub const ALL: [ScheduleSlot; 2] = [ScheduleSlot::MonWedFri, ScheduleSlot::TueThuSat];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleSlot::MonWedFri => "2-4-6",
            ScheduleSlot::TueThuSat => "3-5-7",
        }
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleSlot {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2-4-6" => Ok(ScheduleSlot::MonWedFri),
            "3-5-7" => Ok(ScheduleSlot::TueThuSat),
            other => Err(UnknownLiteral::new("schedule slot", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
    Deleted,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Inactive => "Inactive",
            MemberStatus::Deleted => "Deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::Cancelled => "Cancelled",
            SubscriptionStatus::Expired => "Expired",
        }
    }

    /// Cancelled and Expired are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubscriptionStatus::Active)
    }
}

impl FromStr for SubscriptionStatus {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(SubscriptionStatus::Active),
            "Cancelled" => Ok(SubscriptionStatus::Cancelled),
            "Expired" => Ok(SubscriptionStatus::Expired),
            other => Err(UnknownLiteral::new("subscription status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseStatus {
    Pending,
    Paid,
    Cancelled,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "Pending",
            ExpenseStatus::Paid => "Paid",
            ExpenseStatus::Cancelled => "Cancelled",
        }
    }
}

/// Ledger expense classification.
///
/// `TrainerSalary` and `SessionFee` rows are system-derived (see
/// [`Provenance::SystemAuto`]); the rest are manual bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseType {
    TrainerSalary,
    SessionFee,
    Equipment,
    Other,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::TrainerSalary => "TrainerSalary",
            ExpenseType::SessionFee => "SessionFee",
            ExpenseType::Equipment => "Equipment",
            ExpenseType::Other => "Other",
        }
    }
}

impl FromStr for ExpenseType {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TrainerSalary" => Ok(ExpenseType::TrainerSalary),
            "SessionFee" => Ok(ExpenseType::SessionFee),
            "Equipment" => Ok(ExpenseType::Equipment),
            "Other" => Ok(ExpenseType::Other),
            other => Err(UnknownLiteral::new("expense type", other)),
        }
    }
}

/// Whether a ledger row was entered by an operator or derived by the
/// reconciliation engine. SystemAuto rows are owned by the engine: sweeps
/// and recalculation may delete or rewrite them at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Manual,
    SystemAuto,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Manual => "Manual",
            Provenance::SystemAuto => "SystemAuto",
        }
    }
}

/// Signed ledger delta kinds attached to a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Upgrade,
    Renewal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Upgrade => "Upgrade",
            TransactionKind::Renewal => "Renewal",
        }
    }
}

/// Parse failure for a stored/submitted enum literal.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownLiteral {
    kind: &'static str,
    value: String,
}

impl UnknownLiteral {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_slot_round_trip() {
        for slot in ScheduleSlot::ALL {
            assert_eq!(slot.as_str().parse::<ScheduleSlot>().unwrap(), slot);
        }
        assert!("4-6-8".parse::<ScheduleSlot>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!SubscriptionStatus::Active.is_terminal());
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        assert!(SubscriptionStatus::Expired.is_terminal());
    }
}
