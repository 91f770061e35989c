//! Session API 模块
//!
//! 私教课记账：complete / cancel 均为幂等入口。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/complete", post(handler::complete))
        .route("/cancel", post(handler::cancel))
        .route("/summary", get(handler::summary))
}
