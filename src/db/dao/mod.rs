pub mod access_token_dao;
pub mod auth_code_dao;
pub mod base;
pub mod base_traits;
pub mod client_dao;
mod context;
pub mod error;
pub mod refresh_token_dao;
pub mod role_dao;
pub mod user_dao;

pub use access_token_dao::AccessTokenDao;
pub use auth_code_dao::AuthCodeDao;
pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use client_dao::ClientDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use refresh_token_dao::RefreshTokenDao;
pub use role_dao::RoleDao;
pub use user_dao::UserDao;
