use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    pub async fn insert_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        token: &str,
        access_token_id: &Uuid,
        ttl_days: i64,
    ) -> DaoResult<refresh_token::Model> {
        let expires_at = Utc::now().fixed_offset() + Duration::days(ttl_days);
        let model = refresh_token::ActiveModel {
            token: Set(token.to_string()),
            access_token_id: Set(*access_token_id),
            expires_at: Set(expires_at),
            revoked: Set(false),
            ..Default::default()
        };
        self.create_on(conn, model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(refresh_token::Column::Token.eq(token))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Revoke guarded on `revoked = false`. Two concurrent rotations of the
    /// same token race here; the one that observes zero affected rows lost.
    pub async fn revoke_guarded<C: ConnectionTrait>(
        &self,
        conn: &C,
        token: &str,
    ) -> DaoResult<u64> {
        let result = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .filter(refresh_token::Column::Token.eq(token))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn revoke_by_access_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        access_token_id: &Uuid,
    ) -> DaoResult<u64> {
        let result = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .filter(refresh_token::Column::AccessTokenId.eq(*access_token_id))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn delete_expired(&self) -> DaoResult<u64> {
        let now = Utc::now().fixed_offset();
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::ExpiresAt.lt(now))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
