//! Data models
//!
//! Shared between gym-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-generated).
//! Business dates are `YYYY-MM-DD` strings; row timestamps are Unix millis.

pub mod equipment;
pub mod expense;
pub mod gym;
pub mod ledger_transaction;
pub mod member;
pub mod membership;
pub mod revenue;
pub mod subscription;
pub mod trainer;

// Re-exports
pub use equipment::*;
pub use expense::*;
pub use gym::*;
pub use ledger_transaction::*;
pub use member::*;
pub use membership::*;
pub use revenue::*;
pub use subscription::*;
pub use trainer::*;
