use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{api, oauth};

pub const API_PREFIX: &str = "/api/v1";

pub fn router(state: Arc<AppState>) -> Router {
    // The OAuth protocol surface lives at the root: its wire format is fixed
    // by the protocol, not by the API envelope.
    Router::new()
        .nest(API_PREFIX, api::router(state.clone()))
        .merge(oauth::router(state))
}
