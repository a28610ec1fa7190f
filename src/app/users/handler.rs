//! Users 处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::{User, UserId, UserPayload},
    service::UserStore,
};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct AppState<S> {
    pub users: S,
}

/// 路径参数按原样传入，解析失败是 400 而不是 404
fn parse_id(raw: &str) -> Result<UserId, CoreError> {
    raw.parse()
        .map_err(|_| CoreError::BadRequest(format!("invalid user id: {}", raw)))
}

fn parse_payload(
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<UserPayload, CoreError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))
}

pub async fn list_users<S: UserStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<User>>, CoreError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

pub async fn get_user<S: UserStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<User>, CoreError> {
    let user = state.users.get(parse_id(&id)?).await?;
    Ok(Json(user))
}

pub async fn create_user<S: UserStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), CoreError> {
    let user = state.users.create(parse_payload(payload)?).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user<S: UserStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<User>, CoreError> {
    let id = parse_id(&id)?;
    let user = state.users.update(id, parse_payload(payload)?).await?;
    Ok(Json(user))
}

pub async fn delete_user<S: UserStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, CoreError> {
    state.users.delete(parse_id(&id)?).await?;
    Ok(StatusCode::OK)
}
