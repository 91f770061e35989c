//! 服务器状态
//!
//! [`ServerState`] 只持有配置和连接池 —— 处理器是无状态的，所有
//! 不变量由存储层保证，进程内没有可变缓存需要同步。

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::{AppError, AppResult};

/// Shared per-request state. Arc-backed, cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
}

impl ServerState {
    /// Create the work directory, open the pool, apply migrations.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::dependency(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;
        let db = DbService::new(&config.db_path()).await?;
        Ok(Self {
            config: Arc::new(config.clone()),
            pool: db.pool,
        })
    }

    /// Build a state over an existing pool (tests).
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }
}
