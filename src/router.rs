//! 路由表与中间件组装

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::app::users::{
    handler::{create_user, delete_user, get_user, list_users, update_user, AppState},
    UserStore,
};
use crate::core::middleware::{
    cors_middleware, json_content_type_middleware, request_logging_middleware,
};
use crate::infrastructure::config::HttpConfig;

/// 创建路由
///
/// | 方法   | 路径                  |
/// |--------|-----------------------|
/// | GET    | {prefix}/users        |
/// | POST   | {prefix}/users        |
/// | GET    | {prefix}/users/:id    |
/// | PUT    | {prefix}/users/:id    |
/// | DELETE | {prefix}/users/:id    |
pub fn create_router<S: UserStore>(store: S, config: &HttpConfig) -> Router {
    let users = Router::new()
        .route("/users", get(list_users::<S>).post(create_user::<S>))
        .route(
            "/users/:id",
            get(get_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>),
        );

    let routes = if config.api_prefix.is_empty() {
        users
    } else {
        Router::new().nest(&config.api_prefix, users)
    };

    // fallback 必须在 layer 之前注册，未知路径同样经过中间件
    routes
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(middleware::from_fn(cors_middleware))
                .layer(middleware::from_fn(json_content_type_middleware))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .with_state(AppState { users: store })
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
