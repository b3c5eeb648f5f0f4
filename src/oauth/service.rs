use chrono::Utc;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::{
    config::OAuthConfig,
    db::{
        dao::{AccessTokenDao, AuthCodeDao, ClientDao, DaoBase, DaoLayerError, RefreshTokenDao},
        entities::{access_token, auth_code, oauth_client},
    },
};

use super::{
    error::OAuthError,
    secret::{generate_token, secrets_match},
};

/// Result of a successful code exchange or refresh rotation.
#[derive(Debug)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub scope: Option<String>,
}

/// Manages the full authorization-code grant flow: code issuance, exchange,
/// refresh rotation, validation, revocation and expiry cleanup. Every
/// multi-row mutation runs inside one database transaction so a crash cannot
/// leave both the old and the new credential usable.
#[derive(Clone)]
pub struct TokenService {
    db: DatabaseConnection,
    clients: ClientDao,
    auth_codes: AuthCodeDao,
    access_tokens: AccessTokenDao,
    refresh_tokens: RefreshTokenDao,
    cfg: OAuthConfig,
}

impl TokenService {
    pub fn new(db: &DatabaseConnection, cfg: OAuthConfig) -> Self {
        Self {
            db: db.clone(),
            clients: ClientDao::new(db),
            auth_codes: AuthCodeDao::new(db),
            access_tokens: AccessTokenDao::new(db),
            refresh_tokens: RefreshTokenDao::new(db),
            cfg,
        }
    }

    async fn find_client(&self, client_id: &Uuid) -> Result<oauth_client::Model, OAuthError> {
        let client = match self.clients.find_by_id(*client_id).await {
            Ok(client) => client,
            Err(DaoLayerError::NotFound { .. }) => return Err(OAuthError::InvalidClient),
            Err(err) => return Err(err.into()),
        };
        if client.revoked {
            return Err(OAuthError::ClientRevoked);
        }
        Ok(client)
    }

    /// Client lookup with the standing validity checks (registered, not
    /// revoked) applied.
    pub async fn client_descriptor(
        &self,
        client_id: &Uuid,
    ) -> Result<oauth_client::Model, OAuthError> {
        self.find_client(client_id).await
    }

    /// Validate the authorize request: client exists, is not revoked, the
    /// redirect URI matches the registration exactly and the response type is
    /// `code`. Returns the client descriptor for the consent step; no code is
    /// issued here.
    pub async fn authorize_client(
        &self,
        client_id: &Uuid,
        redirect_uri: &str,
        response_type: &str,
    ) -> Result<oauth_client::Model, OAuthError> {
        let client = self.find_client(client_id).await?;
        if client.redirect_uri != redirect_uri {
            return Err(OAuthError::RedirectMismatch);
        }
        if response_type != "code" {
            return Err(OAuthError::UnsupportedResponseType);
        }
        Ok(client)
    }

    /// Issue a short-lived single-use authorization code bound to the given
    /// user. Persistence is the only side effect.
    pub async fn issue_authorization_code(
        &self,
        client_id: &Uuid,
        user_id: &Uuid,
        scope: Option<&str>,
    ) -> Result<auth_code::Model, OAuthError> {
        let code = self
            .auth_codes
            .create_code(
                &generate_token(),
                client_id,
                user_id,
                scope,
                self.cfg.code_ttl_secs,
            )
            .await?;
        tracing::debug!(client = %client_id, user = %user_id, "issued authorization code");
        Ok(code)
    }

    /// Exchange a code for an access/refresh token pair. The code is marked
    /// used in the same transaction that creates the tokens.
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        client_id: &Uuid,
        client_secret: Option<&str>,
    ) -> Result<TokenGrant, OAuthError> {
        let stored = self
            .auth_codes
            .find_by_code(code)
            .await?
            .ok_or(OAuthError::InvalidCode)?;

        if stored.client_id != *client_id {
            return Err(OAuthError::ClientMismatch);
        }

        let client = self.find_client(client_id).await?;
        if let Some(expected) = client.secret.as_deref() {
            let provided = client_secret.ok_or(OAuthError::InvalidSecret)?;
            if !secrets_match(expected, provided) {
                return Err(OAuthError::InvalidSecret);
            }
        }

        // Expiry wins over the used flag: an expired code always reports
        // CodeExpired, revoked or not.
        if stored.expires_at < Utc::now().fixed_offset() {
            return Err(OAuthError::CodeExpired);
        }
        if stored.revoked {
            // Replay of a consumed code is a security signal, not just a
            // client error.
            tracing::warn!(client = %client_id, "authorization code replay detected");
            return Err(OAuthError::CodeAlreadyUsed);
        }

        let txn = self.db.begin().await?;
        let result = self.exchange_in_txn(&txn, &stored).await;
        match result {
            Ok(grant) => {
                txn.commit().await?;
                tracing::info!(client = %client_id, "authorization code exchanged");
                Ok(grant)
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    async fn exchange_in_txn(
        &self,
        txn: &DatabaseTransaction,
        stored: &auth_code::Model,
    ) -> Result<TokenGrant, OAuthError> {
        let used = self.auth_codes.mark_used(txn, &stored.code).await?;
        if used == 0 {
            // A concurrent exchange flipped the flag between our read and the
            // guarded update.
            return Err(OAuthError::CodeAlreadyUsed);
        }

        self.issue_pair_in_txn(
            txn,
            &stored.client_id,
            Some(&stored.user_id),
            stored.scope.as_deref(),
        )
        .await
    }

    /// Rotate a refresh token: the old access/refresh pair is revoked and a
    /// new pair created, atomically. Of two concurrent rotations exactly one
    /// wins; the loser observes `TokenRevoked`.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        client_id: &Uuid,
    ) -> Result<TokenGrant, OAuthError> {
        let stored = self
            .refresh_tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or(OAuthError::InvalidToken)?;

        if stored.expires_at < Utc::now().fixed_offset() {
            return Err(OAuthError::TokenExpired);
        }
        if stored.revoked {
            tracing::warn!(client = %client_id, "rotated-out refresh token reused");
            return Err(OAuthError::TokenRevoked);
        }

        let access = match self.access_tokens.find_by_id(stored.access_token_id).await {
            Ok(access) => access,
            Err(DaoLayerError::NotFound { .. }) => return Err(OAuthError::InvalidToken),
            Err(err) => return Err(err.into()),
        };
        if access.client_id != *client_id {
            return Err(OAuthError::ClientMismatch);
        }

        let txn = self.db.begin().await?;
        let result = self.rotate_in_txn(&txn, refresh_token, &access).await;
        match result {
            Ok(grant) => {
                txn.commit().await?;
                tracing::info!(client = %client_id, "refresh token rotated");
                Ok(grant)
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    async fn rotate_in_txn(
        &self,
        txn: &DatabaseTransaction,
        refresh_token: &str,
        access: &access_token::Model,
    ) -> Result<TokenGrant, OAuthError> {
        let won = self
            .refresh_tokens
            .revoke_guarded(txn, refresh_token)
            .await?;
        if won == 0 {
            return Err(OAuthError::TokenRevoked);
        }

        self.access_tokens.revoke_by_id(txn, &access.id).await?;

        self.issue_pair_in_txn(
            txn,
            &access.client_id,
            access.user_id.as_ref(),
            access.scope.as_deref(),
        )
        .await
    }

    async fn issue_pair_in_txn(
        &self,
        txn: &DatabaseTransaction,
        client_id: &Uuid,
        user_id: Option<&Uuid>,
        scope: Option<&str>,
    ) -> Result<TokenGrant, OAuthError> {
        let access = self
            .access_tokens
            .insert_token(
                txn,
                &generate_token(),
                client_id,
                user_id,
                scope,
                self.cfg.access_ttl_secs,
            )
            .await?;

        let refresh = self
            .refresh_tokens
            .insert_token(txn, &generate_token(), &access.id, self.cfg.refresh_ttl_days)
            .await?;

        Ok(TokenGrant {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: self.cfg.access_ttl_secs,
            scope: access.scope,
        })
    }

    /// Bearer validation. Missing, revoked and expired all come back as
    /// `None`; only infrastructure failures are errors.
    pub async fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<Option<access_token::Model>, OAuthError> {
        let Some(stored) = self.access_tokens.find_by_token(token).await? else {
            return Ok(None);
        };
        if stored.revoked || stored.expires_at < Utc::now().fixed_offset() {
            return Ok(None);
        }
        Ok(Some(stored))
    }

    /// Idempotent revocation of an access token and the refresh tokens of its
    /// lineage. `false` means the token never existed.
    pub async fn revoke_access_token(&self, token: &str) -> Result<bool, OAuthError> {
        let Some(stored) = self.access_tokens.find_by_token(token).await? else {
            return Ok(false);
        };

        let txn = self.db.begin().await?;
        let result = async {
            self.access_tokens.revoke_by_id(&txn, &stored.id).await?;
            self.refresh_tokens
                .revoke_by_access_token(&txn, &stored.id)
                .await?;
            Ok::<(), OAuthError>(())
        }
        .await;
        match result {
            Ok(()) => {
                txn.commit().await?;
                Ok(true)
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    /// Revocation addressed by refresh token, for `token_type_hint =
    /// "refresh_token"`. Revokes the whole lineage.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<bool, OAuthError> {
        let Some(stored) = self.refresh_tokens.find_by_token(token).await? else {
            return Ok(false);
        };

        let txn = self.db.begin().await?;
        let result = async {
            self.refresh_tokens
                .revoke_by_access_token(&txn, &stored.access_token_id)
                .await?;
            self.access_tokens
                .revoke_by_id(&txn, &stored.access_token_id)
                .await?;
            Ok::<(), OAuthError>(())
        }
        .await;
        match result {
            Ok(()) => {
                txn.commit().await?;
                Ok(true)
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    /// Purge rows already past expiry across all three token tables. Only
    /// logically dead rows are touched, so this is safe next to live traffic.
    pub async fn cleanup_expired_tokens(&self) -> Result<u64, OAuthError> {
        let codes = self.auth_codes.delete_expired().await?;
        let access = self.access_tokens.delete_expired().await?;
        let refresh = self.refresh_tokens.delete_expired().await?;
        let total = codes + access + refresh;
        tracing::info!(codes, access, refresh, "purged expired oauth credentials");
        Ok(total)
    }
}
