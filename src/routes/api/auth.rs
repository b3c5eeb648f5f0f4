use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde::Deserialize;

use crate::{
    auth::SessionTokens,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let service = services.auth(&state.jwt);
    let tokens = service.login(&body.email, &body.password).await?;
    JsonApiResponse::ok(tokens.into())
}

async fn me(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<serde_json::Value> {
    let services = ServiceContext::from_state(state.as_ref());
    let service = services.user_service();
    let user = if let Ok(id) = claims.sub.parse() {
        service.find_by_id(&id).await.ok().flatten()
    } else {
        None
    };

    let email = user.as_ref().map(|u| u.email.as_str()).unwrap_or("unknown");
    let role_id = user.as_ref().map(|u| u.role_id.to_string());

    JsonApiResponse::ok(serde_json::json!({
        "sub": claims.sub,
        "email": email,
        "role_id": role_id,
        "roles": claims.roles,
        "iat": claims.iat,
        "exp": claims.exp
    }))
}

impl From<SessionTokens> for SessionResponse {
    fn from(tokens: SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}
