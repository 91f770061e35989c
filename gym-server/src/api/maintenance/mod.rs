//! Maintenance API 模块
//!
//! 核心不含后台调度器；过期清扫与工资核算由外部定时器触发，
//! 两个入口都幂等，重复触发/双触发安全。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/maintenance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/expire-subscriptions", post(handler::expire_subscriptions))
        .route("/recalculate-salaries", post(handler::recalculate_salaries))
}
