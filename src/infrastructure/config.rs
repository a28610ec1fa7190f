//! 配置基础设施
//!
//! 所有配置在启动时从环境变量读取一次，缺失或非法的值直接导致启动失败。

use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const API_PREFIX: &str = "API_PREFIX";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";

/// 服务配置
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 绑定地址
    pub host: IpAddr,
    /// HTTP 服务端口
    pub port: u16,
    /// 路由挂载前缀，空串表示挂在根路径
    pub api_prefix: String,
    /// 单个请求的超时时间
    pub request_timeout: Duration,
}

/// 数据库配置
#[derive(Clone)]
pub struct DatabaseConfig {
    /// 连接字符串
    pub url: String,
    /// 连接池最大连接数
    pub max_connections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            api_prefix: "/api".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// 连接字符串里可能带密码，不直接输出
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过任意键值查找函数加载配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HttpConfig::default();

        let url = lookup(DATABASE_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;
        PgConnectOptions::from_str(&url).map_err(|e| ConfigError::Invalid {
            key: DATABASE_URL,
            reason: e.to_string(),
        })?;

        let host = parse_or(&lookup, HOST, defaults.host)?;
        let port = parse_or(&lookup, PORT, defaults.port)?;
        let timeout_secs: u64 = parse_or(&lookup, REQUEST_TIMEOUT_SECS, 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: REQUEST_TIMEOUT_SECS,
                reason: "必须大于0".to_string(),
            });
        }
        let max_connections: u32 = parse_or(&lookup, DATABASE_MAX_CONNECTIONS, 10)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: DATABASE_MAX_CONNECTIONS,
                reason: "必须大于0".to_string(),
            });
        }

        let api_prefix = match lookup(API_PREFIX) {
            Some(raw) => normalize_prefix(&raw)?,
            None => defaults.api_prefix,
        };

        Ok(Self {
            http: HttpConfig {
                host,
                port,
                api_prefix,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("{:?}: {}", raw, e),
        }),
        None => Ok(default),
    }
}

/// `/api/go/` -> `/api/go`，`/` -> 空串
fn normalize_prefix(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('/') {
        return Err(ConfigError::Invalid {
            key: API_PREFIX,
            reason: format!("{:?}: 必须以 / 开头", raw),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("缺少环境变量: {0}")]
    Missing(&'static str),
    #[error("环境变量 {key} 无效: {reason}")]
    Invalid { key: &'static str, reason: String },
}
