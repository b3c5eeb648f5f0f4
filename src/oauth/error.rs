use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::dao::DaoLayerError;

/// Typed failures of the authorization-code and refresh flows. Every variant
/// is a deterministic business failure; none are retried internally.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("client is not registered")]
    InvalidClient,
    #[error("client registration has been revoked")]
    ClientRevoked,
    #[error("redirect_uri does not match the registered value")]
    RedirectMismatch,
    #[error("only response_type=code is supported")]
    UnsupportedResponseType,
    #[error("unsupported grant_type")]
    UnsupportedGrantType,
    #[error("missing required parameter: {0}")]
    InvalidRequest(&'static str),
    #[error("authorization code is not recognized")]
    InvalidCode,
    #[error("credential was issued to a different client")]
    ClientMismatch,
    #[error("client secret does not match")]
    InvalidSecret,
    #[error("authorization code has expired")]
    CodeExpired,
    #[error("authorization code has already been used")]
    CodeAlreadyUsed,
    #[error("refresh token is not recognized")]
    InvalidToken,
    #[error("refresh token has expired")]
    TokenExpired,
    #[error("refresh token has been revoked")]
    TokenRevoked,
    #[error("too many token requests, slow down")]
    RateLimited,
    #[error(transparent)]
    Dao(#[from] DaoLayerError),
}

impl OAuthError {
    /// RFC 6749 error code for the wire body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidClient
            | Self::ClientRevoked
            | Self::ClientMismatch
            | Self::InvalidSecret => "invalid_client",
            Self::RedirectMismatch
            | Self::InvalidCode
            | Self::CodeExpired
            | Self::CodeAlreadyUsed
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::TokenRevoked => "invalid_grant",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RateLimited => "temporarily_unavailable",
            Self::Dao(_) => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Dao(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<sea_orm::DbErr> for OAuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Dao(DaoLayerError::Db(err))
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "oauth request failed");
        }
        let body = serde_json::json!({
            "error": self.error_code(),
            "error_description": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
