use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    menu::MenuView,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub locale: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/menu", get(menu)).with_state(state)
}

async fn menu(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MenuQuery>,
    claims: AuthGuard,
) -> ApiResult<MenuView> {
    let user_id = claims
        .sub
        .parse()
        .map_err(|_| AppError::unauthorized("Invalid token subject"))?;

    let services = ServiceContext::from_state(state.as_ref());
    let service = services.user_service();
    let user = service
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Unknown user"))?;
    // The role is read fresh on every request: a role switch must change the
    // cache key immediately.
    let role = service.role_of(&user).await?;
    let permissions = role.permission_list();

    let locale = query
        .locale
        .unwrap_or_else(|| state.config.menu.default_locale.clone());

    let view = state
        .menu
        .menu_for_user(&user.id, &role.id, &permissions, &locale)
        .await;
    JsonApiResponse::ok(view)
}
