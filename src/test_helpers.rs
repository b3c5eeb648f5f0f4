use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    config::{AppConfig, AuthConfig},
    db::entities::{access_token, auth_code, oauth_client, refresh_token, role, user},
    menu::{InMemoryMenuCache, MenuService, Translations, tree::default_menu},
    routes::router,
    state::AppState,
};

/// Fixed timestamp for created_at/updated_at fields in fixtures.
pub fn ts() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp should be valid")
}

/// Wall-clock now, for expiry fields the code under test compares against.
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub fn user_model(id: Uuid, email: &str, role_id: Uuid) -> user::Model {
    user::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role_id,
        last_login_at: None,
    }
}

pub fn role_model(id: Uuid, name: &str, permissions: &[&str]) -> role::Model {
    role::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        name: name.to_string(),
        permissions: serde_json::json!(permissions),
    }
}

pub fn client_model(id: Uuid, name: &str, secret: Option<&str>) -> oauth_client::Model {
    oauth_client::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        name: name.to_string(),
        secret: secret.map(str::to_string),
        redirect_uri: "https://app.hemis.uz/callback".to_string(),
        revoked: false,
    }
}

pub fn auth_code_model(
    code: &str,
    client_id: Uuid,
    user_id: Uuid,
    expires_at: DateTime<FixedOffset>,
    revoked: bool,
) -> auth_code::Model {
    auth_code::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        code: code.to_string(),
        client_id,
        user_id,
        scope: None,
        expires_at,
        revoked,
    }
}

pub fn access_token_model(
    token: &str,
    client_id: Uuid,
    user_id: Option<Uuid>,
    expires_at: DateTime<FixedOffset>,
    revoked: bool,
) -> access_token::Model {
    access_token::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        token: token.to_string(),
        client_id,
        user_id,
        scope: None,
        expires_at,
        revoked,
    }
}

pub fn refresh_token_model(
    token: &str,
    access_token_id: Uuid,
    expires_at: DateTime<FixedOffset>,
    revoked: bool,
) -> refresh_token::Model {
    refresh_token::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        token: token.to_string(),
        access_token_id,
        expires_at,
        revoked,
    }
}

pub fn test_config(secret: &[u8]) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth = Some(AuthConfig {
        jwt_secret: String::from_utf8_lossy(secret).into_owned(),
        admin_email: "admin@hemis.uz".to_string(),
        admin_password: "adminpassword".to_string(),
    });
    cfg
}

pub fn test_state(db: DatabaseConnection, secret: &[u8]) -> Arc<AppState> {
    let cfg = test_config(secret);
    let jwt = JwtKeys::from_secret(secret);
    let menu = MenuService::with_parts(
        default_menu(),
        Translations::default_tables(),
        Arc::new(InMemoryMenuCache::new()),
        cfg.menu.cache_ttl_secs,
    );
    AppState::new(cfg, db, jwt, menu)
}

pub fn test_router_with_db(db: DatabaseConnection, secret: &[u8]) -> Router {
    router(test_state(db, secret))
}

pub fn test_router(secret: &[u8]) -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    test_router_with_db(db, secret)
}
