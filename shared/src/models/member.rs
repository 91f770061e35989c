//! Member Model

use serde::{Deserialize, Serialize};

/// Member entity (会员)
///
/// `status` is one of `Active` / `Inactive` / `Deleted`; delete is a soft
/// transition so historical ledger rows keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub gym_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub gym_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Update member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}
