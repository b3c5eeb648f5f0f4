use sea_orm::{DatabaseConnection, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{oauth_client, prelude::OAuthClient};

#[derive(Clone)]
pub struct ClientDao {
    db: DatabaseConnection,
}

impl DaoBase for ClientDao {
    type Entity = OAuthClient;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ClientDao {
    pub async fn create_client(
        &self,
        name: &str,
        secret: Option<&str>,
        redirect_uri: &str,
    ) -> DaoResult<oauth_client::Model> {
        let model = oauth_client::ActiveModel {
            name: Set(name.to_string()),
            secret: Set(secret.map(str::to_string)),
            redirect_uri: Set(redirect_uri.to_string()),
            revoked: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::test_helpers::client_model;

    use super::ClientDao;

    #[tokio::test]
    async fn find_by_id_returns_client() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[client_model(id, "hemis-mobile", None)]])
            .into_connection();
        let dao = ClientDao::new(&db);

        let client = dao.find_by_id(id).await.expect("client should exist");
        assert_eq!(client.name, "hemis-mobile");
        assert!(client.secret.is_none());
    }

    #[tokio::test]
    async fn find_by_id_maps_missing_row_to_not_found() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::db::entities::oauth_client::Model>::new()])
            .into_connection();
        let dao = ClientDao::new(&db);

        let err = dao.find_by_id(id).await.expect_err("lookup should fail");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }
}
