//! API 路由模块
//!
//! # 结构
//!
//! 每个资源一个子模块：`mod.rs` 注册路由，`handler.rs` 实现处理器。
//!
//! - [`health`] - 健康检查
//! - [`gyms`] / [`members`] / [`trainers`] / [`memberships`] /
//!   [`equipment`] - 目录 CRUD（周边持久化）
//! - [`subscriptions`] - 订阅状态机入口
//! - [`sessions`] - 私教课记账（幂等 complete / cancel）
//! - [`expenses`] / [`revenues`] / [`transactions`] - 账本读写
//! - [`maintenance`] - 外部触发的维护入口（过期清扫、工资核算）

pub mod equipment;
pub mod expenses;
pub mod gyms;
pub mod health;
pub mod maintenance;
pub mod members;
pub mod memberships;
pub mod revenues;
pub mod sessions;
pub mod subscriptions;
pub mod trainers;
pub mod transactions;

use std::time::Duration;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::{Config, ServerState};

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(gyms::router())
        .merge(members::router())
        .merge(trainers::router())
        .merge(memberships::router())
        .merge(equipment::router())
        .merge(subscriptions::router())
        .merge(sessions::router())
        .merge(expenses::router())
        .merge(revenues::router())
        .merge(transactions::router())
        .merge(maintenance::router())
}

/// Build a fully configured application with all middleware layers.
pub fn build_app(config: &Config) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Bounded request lifetime - no storage call may hang a handler
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
