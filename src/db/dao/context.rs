use sea_orm::DatabaseConnection;

use super::{AccessTokenDao, AuthCodeDao, ClientDao, DaoBase, RefreshTokenDao, RoleDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn role(&self) -> RoleDao {
        DaoBase::new(&self.db)
    }

    pub fn client(&self) -> ClientDao {
        DaoBase::new(&self.db)
    }

    pub fn auth_code(&self) -> AuthCodeDao {
        DaoBase::new(&self.db)
    }

    pub fn access_token(&self) -> AccessTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao {
        DaoBase::new(&self.db)
    }
}
