use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::access_token::{self, Entity as AccessToken};

#[derive(Clone)]
pub struct AccessTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for AccessTokenDao {
    type Entity = AccessToken;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AccessTokenDao {
    pub async fn insert_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        token: &str,
        client_id: &Uuid,
        user_id: Option<&Uuid>,
        scope: Option<&str>,
        ttl_secs: i64,
    ) -> DaoResult<access_token::Model> {
        let expires_at = Utc::now().fixed_offset() + Duration::seconds(ttl_secs);
        let model = access_token::ActiveModel {
            token: Set(token.to_string()),
            client_id: Set(*client_id),
            user_id: Set(user_id.copied()),
            scope: Set(scope.map(str::to_string)),
            expires_at: Set(expires_at),
            revoked: Set(false),
            ..Default::default()
        };
        self.create_on(conn, model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<access_token::Model>> {
        let token = token.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(access_token::Column::Token.eq(token))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn revoke_by_id<C: ConnectionTrait>(&self, conn: &C, id: &Uuid) -> DaoResult<u64> {
        let result = AccessToken::update_many()
            .col_expr(access_token::Column::Revoked, Expr::value(true))
            .filter(access_token::Column::Id.eq(*id))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn revoke_by_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        token: &str,
    ) -> DaoResult<u64> {
        let result = AccessToken::update_many()
            .col_expr(access_token::Column::Revoked, Expr::value(true))
            .filter(access_token::Column::Token.eq(token))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn delete_expired(&self) -> DaoResult<u64> {
        let now = Utc::now().fixed_offset();
        let result = AccessToken::delete_many()
            .filter(access_token::Column::ExpiresAt.lt(now))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::dao::DaoBase;
    use crate::test_helpers::{access_token_model, ts};

    use super::AccessTokenDao;

    #[tokio::test]
    async fn find_by_token_carries_scope() {
        let client_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let mut model = access_token_model(
            "token-1",
            client_id,
            Some(user_id),
            ts() + Duration::hours(1),
            false,
        );
        model.scope = Some("student.read report.read".to_string());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model]])
            .into_connection();
        let dao = AccessTokenDao::new(&db);

        let token = dao
            .find_by_token("token-1")
            .await
            .expect("query should succeed")
            .expect("token should exist");
        assert_eq!(
            token.scope_list(),
            vec!["student.read".to_string(), "report.read".to_string()]
        );
    }

    #[tokio::test]
    async fn revoke_by_token_is_idempotent_on_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = AccessTokenDao::new(&db);

        let affected = dao
            .revoke_by_token(&db, "unknown")
            .await
            .expect("update should succeed");
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn delete_expired_reports_purged_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 7,
            }])
            .into_connection();
        let dao = AccessTokenDao::new(&db);

        let removed = dao.delete_expired().await.expect("delete should succeed");
        assert_eq!(removed, 7);
    }

    #[tokio::test]
    async fn scope_list_is_empty_without_scope() {
        let model = access_token_model("token-1", Uuid::new_v4(), None, ts(), false);
        assert!(model.scope_list().is_empty());
    }
}
