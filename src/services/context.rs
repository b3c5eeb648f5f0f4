use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::JwtKeys,
    db::dao::{ClientDao, DaoContext, RoleDao, UserDao},
    state::AppState,
};

use super::{auth_service::AuthService, user_service::UserService};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn users(&self) -> UserDao {
        self.daos.user()
    }

    pub fn roles(&self) -> RoleDao {
        self.daos.role()
    }

    pub fn clients(&self) -> ClientDao {
        self.daos.client()
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.daos.user(), self.daos.role())
    }

    pub fn auth(&self, jwt: &JwtKeys) -> AuthService {
        AuthService::new(self.user_service(), jwt.clone())
    }
}
