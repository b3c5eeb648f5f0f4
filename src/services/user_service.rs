use uuid::Uuid;

use crate::{
    db::{
        dao::{DaoBase, DaoLayerError, RoleDao, UserDao},
        entities::{role, user},
    },
    error::AppError,
};

#[derive(Clone)]
pub struct UserService {
    users: UserDao,
    roles: RoleDao,
}

impl UserService {
    pub fn new(users: UserDao, roles: RoleDao) -> Self {
        Self { users, roles }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        match self.users.find_by_id(*id).await {
            Ok(user) => Ok(Some(user)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        self.users.find_by_email(email).await.map_err(Into::into)
    }

    pub async fn set_last_login(
        &self,
        id: &Uuid,
        at: &chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<(), AppError> {
        self.users.set_last_login(id, at).await.map_err(Into::into)
    }

    /// Resolve the user's role row, the source of both claim roles and menu
    /// permissions.
    pub async fn role_of(&self, user: &user::Model) -> Result<role::Model, AppError> {
        match self.roles.find_by_id(user.role_id).await {
            Ok(role) => Ok(role),
            Err(DaoLayerError::NotFound { .. }) => {
                Err(AppError::internal("user references a missing role"))
            }
            Err(err) => Err(err.into()),
        }
    }
}
