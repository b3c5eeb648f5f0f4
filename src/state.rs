use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::jwt::JwtKeys, config::AppConfig, menu::MenuService, oauth::RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    pub menu: MenuService,
    pub token_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        jwt: JwtKeys,
        menu: MenuService,
    ) -> Arc<Self> {
        let token_limiter = RateLimiter::new_per_minute(config.oauth.token_rate_per_minute);
        Arc::new(Self {
            config,
            db,
            jwt,
            menu,
            token_limiter,
        })
    }
}
