use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{admin, auth, menu, public};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(auth::router(state.clone()))
        .merge(menu::router(state.clone()))
        .merge(admin::router(state))
}
