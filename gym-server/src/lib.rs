//! Gym Back-Office Server
//!
//! 健身房后台服务：会员/教练/套餐/器材目录 + 私教补偿与财务对账引擎。
//!
//! # 模块结构
//!
//! - [`core`] - 配置、共享状态、HTTP 启动
//! - [`db`] - SQLite 连接池、迁移与 repository 层
//! - [`services`] - 引擎组件（订阅状态机、课时账、工资核算、对账协调）
//! - [`api`] - HTTP 路由与处理器
//! - [`utils`] - 错误类型、日志、时间与校验工具

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};

/// 启动前置：加载 .env、初始化日志
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

/// 启动横幅
pub fn print_banner() {
    println!(
        "\n  ╔══════════════════════════════════════╗\
         \n  ║   Gym Back-Office Server    v{:<8} ║\
         \n  ╚══════════════════════════════════════╝\n",
        env!("CARGO_PKG_VERSION")
    );
}
