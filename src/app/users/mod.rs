//! users 资源：模型、数据访问、HTTP 处理器

pub mod handler;
pub mod model;
pub mod service;

pub use model::{User, UserId, UserPayload};
pub use service::{UserService, UserStore};
