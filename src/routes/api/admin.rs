use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AdminRole,
    error::AppError,
    middleware::AuthRoleGuard,
    oauth::{TokenService, secret::generate_token},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub redirect_uri: String,
    /// Confidential clients get a generated secret, returned exactly once.
    #[serde(default)]
    pub confidential: bool,
}

#[derive(Debug, Deserialize)]
pub struct InvalidateMenuRequest {
    pub user_id: Uuid,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/oauth/clients", post(create_client))
        .route("/admin/oauth/cleanup", post(cleanup_tokens))
        .route("/admin/menu/invalidate", post(invalidate_menu))
        .with_state(state)
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<AdminRole>,
    Json(body): Json<CreateClientRequest>,
) -> ApiResult<serde_json::Value> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Client name required"));
    }
    if body.redirect_uri.trim().is_empty() {
        return Err(AppError::bad_request("Redirect URI required"));
    }

    let secret = body.confidential.then(generate_token);
    let services = ServiceContext::from_state(state.as_ref());
    let client = services
        .clients()
        .create_client(body.name.trim(), secret.as_deref(), body.redirect_uri.trim())
        .await?;

    JsonApiResponse::ok(serde_json::json!({
        "id": client.id,
        "name": client.name,
        "redirect_uri": client.redirect_uri,
        "secret": secret,
    }))
}

async fn cleanup_tokens(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<AdminRole>,
) -> ApiResult<serde_json::Value> {
    let service = TokenService::new(&state.db, state.config.oauth.clone());
    let removed = service
        .cleanup_expired_tokens()
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;
    JsonApiResponse::ok(serde_json::json!({ "removed": removed }))
}

async fn invalidate_menu(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<AdminRole>,
    Json(body): Json<InvalidateMenuRequest>,
) -> ApiResult<serde_json::Value> {
    let invalidated = state.menu.invalidate_user(&body.user_id).await;
    JsonApiResponse::ok(serde_json::json!({ "invalidated": invalidated }))
}
