//! 测试公共工具：内存存储、请求辅助函数、PostgreSQL 测试库

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Executor,
};
use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tower::ServiceExt;
use users_api::{create_router, HttpConfig, StoreError, User, UserId, UserPayload, UserStore};

/// 内存实现，用于在没有数据库时测试路由和中间件
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<Mutex<(UserId, BTreeMap<UserId, User>)>>,
    failing: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每个操作先睡眠 `delay`，用于触发请求超时
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// 打开后所有操作都返回数据库错误
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn check(&self) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.check().await?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.1.values().cloned().collect())
    }

    async fn get(&self, id: UserId) -> Result<User, StoreError> {
        self.check().await?;
        let rows = self.rows.lock().unwrap();
        rows.1.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, payload: UserPayload) -> Result<User, StoreError> {
        self.check().await?;
        let mut rows = self.rows.lock().unwrap();
        rows.0 += 1;
        let user = User {
            id: rows.0,
            name: payload.name,
            email: payload.email,
        };
        rows.1.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, payload: UserPayload) -> Result<User, StoreError> {
        self.check().await?;
        let mut rows = self.rows.lock().unwrap();
        let user = rows.1.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.name = payload.name;
        user.email = payload.email;
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.check().await?;
        let mut rows = self.rows.lock().unwrap();
        rows.1.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

pub fn memory_app() -> (Router, MemoryUserStore) {
    let store = MemoryUserStore::new();
    (create_router(store.clone(), &HttpConfig::default()), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// 每个测试使用独立 schema 的 PostgreSQL 连接池
pub struct TestDatabase {
    pub pool: PgPool,
    pub schema: String,
    url: String,
}

static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

impl TestDatabase {
    /// 未设置 `TEST_DATABASE_URL` 时返回 `None`，调用方直接跳过
    pub async fn connect() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let schema = format!(
            "users_api_test_{}_{}",
            std::process::id(),
            SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");
        admin
            .execute(format!("CREATE SCHEMA {}", schema).as_str())
            .await
            .expect("Failed to create test schema");
        admin.close().await;

        let search_path = format!("SET search_path TO {}", schema);
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .after_connect(move |conn, _meta| {
                let sql = search_path.clone();
                Box::pin(async move {
                    conn.execute(sql.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("Failed to connect to test database");

        Some(Self { pool, schema, url })
    }

    pub async fn cleanup(self) {
        self.pool.close().await;
        if let Ok(admin) = PgPoolOptions::new().max_connections(1).connect(&self.url).await {
            let _ = admin
                .execute(format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema).as_str())
                .await;
            admin.close().await;
        }
    }
}
