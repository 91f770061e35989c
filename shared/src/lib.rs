//! Shared types for the gym back-office
//!
//! Domain models and small utilities used by both the server and
//! API clients. DB row derives are behind the `db` feature so the
//! frontend build does not pull in sqlx.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
pub use types::{
    ExpenseStatus, ExpenseType, MemberStatus, Provenance, ScheduleSlot, SubscriptionStatus,
    TransactionKind,
};
