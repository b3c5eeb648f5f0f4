use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Role, role};

#[derive(Clone)]
pub struct RoleDao {
    db: DatabaseConnection,
}

impl DaoBase for RoleDao {
    type Entity = Role;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RoleDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<role::Model>> {
        let name = name.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(role::Column::Name.eq(name))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_role(&self, name: &str, permissions: &[&str]) -> DaoResult<role::Model> {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
            permissions: Set(serde_json::json!(permissions)),
            ..Default::default()
        };
        self.create(model).await
    }
}
