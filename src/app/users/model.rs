//! Users 数据模型

use serde::{Deserialize, Serialize};

/// 主键类型，对应 `SERIAL`
pub type UserId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// 创建/更新请求体，请求中的 `id` 会被忽略
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}
