use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::auth_code::{self, Entity as AuthCode};

#[derive(Clone)]
pub struct AuthCodeDao {
    db: DatabaseConnection,
}

impl DaoBase for AuthCodeDao {
    type Entity = AuthCode;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AuthCodeDao {
    pub async fn create_code(
        &self,
        code: &str,
        client_id: &Uuid,
        user_id: &Uuid,
        scope: Option<&str>,
        ttl_secs: i64,
    ) -> DaoResult<auth_code::Model> {
        let expires_at = Utc::now().fixed_offset() + Duration::seconds(ttl_secs);
        let model = auth_code::ActiveModel {
            code: Set(code.to_string()),
            client_id: Set(*client_id),
            user_id: Set(*user_id),
            scope: Set(scope.map(str::to_string)),
            expires_at: Set(expires_at),
            revoked: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_code(&self, code: &str) -> DaoResult<Option<auth_code::Model>> {
        let code = code.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(auth_code::Column::Code.eq(code))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Flip the single-use flag. Guarded on `revoked = false` so only one
    /// exchange of a given code can ever observe an affected row.
    pub async fn mark_used<C: ConnectionTrait>(&self, conn: &C, code: &str) -> DaoResult<u64> {
        let result = AuthCode::update_many()
            .col_expr(auth_code::Column::Revoked, Expr::value(true))
            .filter(auth_code::Column::Code.eq(code))
            .filter(auth_code::Column::Revoked.eq(false))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn delete_expired(&self) -> DaoResult<u64> {
        let now = Utc::now().fixed_offset();
        let result = AuthCode::delete_many()
            .filter(auth_code::Column::ExpiresAt.lt(now))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::auth_code;
    use crate::test_helpers::{auth_code_model, ts};

    use super::AuthCodeDao;

    #[tokio::test]
    async fn find_by_code_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<auth_code::Model>::new()])
            .into_connection();
        let dao = AuthCodeDao::new(&db);

        let result = dao
            .find_by_code("missing-code")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_by_code_returns_row_when_present() {
        let client_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[auth_code_model(
                "code-1",
                client_id,
                user_id,
                ts() + chrono::Duration::minutes(10),
                false,
            )]])
            .into_connection();
        let dao = AuthCodeDao::new(&db);

        let code = dao
            .find_by_code("code-1")
            .await
            .expect("query should succeed")
            .expect("code should exist");
        assert_eq!(code.client_id, client_id);
        assert_eq!(code.user_id, user_id);
        assert!(!code.revoked);
    }

    #[tokio::test]
    async fn mark_used_reports_affected_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = AuthCodeDao::new(&db);

        let affected = dao
            .mark_used(&db, "code-1")
            .await
            .expect("update should succeed");
        assert_eq!(affected, 1);
    }

    #[tokio::test]
    async fn mark_used_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("update failed".to_string())])
            .into_connection();
        let dao = AuthCodeDao::new(&db);

        let err = dao
            .mark_used(&db, "code-1")
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
