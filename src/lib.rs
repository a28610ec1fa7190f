//! # users-api
//!
//! 基于 Axum + SQLx 的最小化用户 CRUD 服务：
//! - `infrastructure`：环境变量配置、日志、PostgreSQL 连接池与建表
//! - `app::users`：用户模型、数据访问、HTTP 处理器
//! - `core`：错误类型与中间件（CORS、JSON 内容类型、请求日志）
//! - `router`：路由表与中间件组装

pub mod app;
pub mod core;
pub mod infrastructure;
pub mod router;

pub use app::users::{User, UserId, UserPayload, UserService, UserStore};
pub use crate::core::error::{CoreError, StoreError};
pub use infrastructure::config::{Config, ConfigError, HttpConfig};
pub use router::create_router;
