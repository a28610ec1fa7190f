//! Users 数据访问层
//!
//! 每个操作只执行一条 SQL；连接从连接池借出，查询结束即归还。

use sqlx::postgres::PgPool;
use std::future::Future;
use tracing::info;

use super::model::{User, UserId, UserPayload};
use crate::core::error::StoreError;

/// 数据访问接口，处理器只依赖这个 trait
pub trait UserStore: Clone + Send + Sync + 'static {
    /// 全部用户，顺序由存储决定
    fn list(&self) -> impl Future<Output = Result<Vec<User>, StoreError>> + Send;

    fn get(&self, id: UserId) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// 插入新行，id 由数据库生成
    fn create(&self, payload: UserPayload) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// 没有匹配的行时返回 `StoreError::NotFound`
    fn update(
        &self,
        id: UserId,
        payload: UserPayload,
    ) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// 没有匹配的行时返回 `StoreError::NotFound`
    fn delete(&self, id: UserId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// 基于 PostgreSQL 的实现
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for UserService {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get(&self, id: UserId) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, payload: UserPayload) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .fetch_one(&self.pool)
        .await?;

        info!("Created user: {} ({})", user.name, user.id);
        Ok(user)
    }

    async fn update(&self, id: UserId, payload: UserPayload) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $1, email = $2 WHERE id = $3 RETURNING id, name, email",
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        info!("Updated user: {} ({})", user.name, user.id);
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        info!("Deleted user: {}", id);
        Ok(())
    }
}
