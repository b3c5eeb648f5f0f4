use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    middleware::AuthGuard,
    oauth::{OAuthError, TokenService},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/oauth/authorize", get(authorize).post(approve))
        .route("/oauth/token", post(token))
        .route("/oauth/userinfo", get(userinfo))
        .route("/oauth/revoke", post(revoke))
        .with_state(state)
}

fn token_service(state: &AppState) -> TokenService {
    TokenService::new(&state.db, state.config.oauth.clone())
}

#[derive(Debug, Deserialize)]
struct AuthorizeQuery {
    client_id: Uuid,
    redirect_uri: String,
    response_type: String,
    state: Option<String>,
}

/// First leg of the grant: validate the client and echo its descriptor for
/// the consent screen. No code is issued here.
async fn authorize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Json<serde_json::Value>, OAuthError> {
    let client = token_service(&state)
        .authorize_client(&query.client_id, &query.redirect_uri, &query.response_type)
        .await?;

    Ok(Json(serde_json::json!({
        "client": { "id": client.id, "name": client.name },
        "redirect_uri": client.redirect_uri,
        "response_type": "code",
        "state": query.state,
    })))
}

#[derive(Debug, Deserialize)]
struct ApproveRequest {
    client_id: Uuid,
    #[serde(default)]
    redirect_uri: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// Consent confirmation: issue an authorization code bound to the session
/// principal and hand back the redirect URL the browser should follow.
async fn approve(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<serde_json::Value>, OAuthError> {
    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| OAuthError::InvalidRequest("subject"))?;

    let service = token_service(&state);
    let client = service.client_descriptor(&body.client_id).await?;
    let redirect_uri = body.redirect_uri.as_deref().unwrap_or(&client.redirect_uri);
    if redirect_uri != client.redirect_uri {
        return Err(OAuthError::RedirectMismatch);
    }

    let code = service
        .issue_authorization_code(&body.client_id, &user_id, body.scope.as_deref())
        .await?;

    let mut redirect_url = format!("{}?code={}", redirect_uri, code.code);
    if let Some(value) = body.state.as_deref() {
        redirect_url.push_str("&state=");
        redirect_url.push_str(&urlencode(value));
    }

    let expires_in = (code.expires_at - chrono::Utc::now().fixed_offset()).num_seconds();
    Ok(Json(serde_json::json!({
        "redirect_url": redirect_url,
        "code": code.code,
        "expires_in": expires_in,
    })))
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    grant_type: String,
    client_id: Uuid,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    redirect_uri: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

async fn token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<serde_json::Value>, OAuthError> {
    if !state
        .token_limiter
        .allow(&body.client_id.to_string())
        .await
    {
        return Err(OAuthError::RateLimited);
    }

    let service = token_service(&state);
    let grant = match body.grant_type.as_str() {
        "authorization_code" => {
            let code = body.code.as_deref().ok_or(OAuthError::InvalidRequest("code"))?;
            if let Some(redirect) = body.redirect_uri.as_deref() {
                let client = service.client_descriptor(&body.client_id).await?;
                if client.redirect_uri != redirect {
                    return Err(OAuthError::RedirectMismatch);
                }
            }
            service
                .exchange_authorization_code(code, &body.client_id, body.client_secret.as_deref())
                .await?
        }
        "refresh_token" => {
            let refresh = body
                .refresh_token
                .as_deref()
                .ok_or(OAuthError::InvalidRequest("refresh_token"))?;
            service.refresh_access_token(refresh, &body.client_id).await?
        }
        _ => return Err(OAuthError::UnsupportedGrantType),
    };

    Ok(Json(serde_json::json!({
        "access_token": grant.access_token,
        "token_type": grant.token_type,
        "expires_in": grant.expires_in,
        "refresh_token": grant.refresh_token,
        "scope": grant.scope,
    })))
}

#[derive(Debug, Deserialize)]
struct UserinfoQuery {
    access_token: String,
}

async fn userinfo(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserinfoQuery>,
) -> Result<Response, OAuthError> {
    let token = token_service(&state)
        .validate_access_token(&query.access_token)
        .await?;

    let Some(token) = token else {
        let body = serde_json::json!({ "error": "invalid_token" });
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    };

    let sub = token
        .user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| token.client_id.to_string());
    let body = serde_json::json!({
        "sub": sub,
        "client_id": token.client_id,
        "scopes": token.scope_list(),
        "exp": token.expires_at.timestamp(),
    });
    Ok(Json(body).into_response())
}

#[derive(Debug, Deserialize)]
struct RevokeRequest {
    token: String,
    #[serde(default)]
    token_type_hint: Option<String>,
}

async fn revoke(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RevokeRequest>,
) -> Result<Json<serde_json::Value>, OAuthError> {
    let service = token_service(&state);

    let revoked = match body.token_type_hint.as_deref() {
        Some("refresh_token") => {
            service.revoke_refresh_token(&body.token).await?
                || service.revoke_access_token(&body.token).await?
        }
        _ => {
            service.revoke_access_token(&body.token).await?
                || service.revoke_refresh_token(&body.token).await?
        }
    };

    let message = if revoked {
        "token revoked"
    } else {
        "token was not found"
    };
    Ok(Json(serde_json::json!({
        "success": revoked,
        "message": message,
    })))
}

/// Percent-encode a query value (unreserved characters pass through).
fn urlencode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}
