//! Core Module
//!
//! 服务器骨架：配置、共享状态、HTTP 启动。

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
