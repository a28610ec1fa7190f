//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

use super::config::DatabaseConfig;

/// 建表语句，可重复执行
pub const CREATE_USERS_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, name TEXT, email TEXT)";

/// 进程级数据库句柄，启动时创建，关闭时释放
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(8))
            .connect(&config.url)
            .await?;

        info!(
            "Connected to database (max_connections = {})",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// 确保 users 表存在
    pub async fn init_schema(&self) -> Result<(), Error> {
        init_schema(&self.pool).await
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

pub async fn init_schema(pool: &PgPool) -> Result<(), Error> {
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;
    info!("Schema ready: users");
    Ok(())
}
