//! Expense API 模块
//!
//! 手工记账行（器材/杂项）走 POST；引擎生成的行（工资、课时费）
//! 只能由引擎写入，这里仅提供查询、结算与受限删除。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/expenses", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/pay", post(handler::pay))
}
