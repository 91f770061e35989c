//! Equipment Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Equipment {
    pub id: i64,
    pub gym_id: i64,
    pub name: String,
    pub purchase_cost: Option<f64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCreate {
    pub gym_id: i64,
    pub name: String,
    pub purchase_cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentUpdate {
    pub name: Option<String>,
    pub purchase_cost: Option<f64>,
    pub status: Option<String>,
}
