use anyhow::{Result, bail};

use crate::auth::password::MIN_PASSWORD_LEN;

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "auth.admin_password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }

        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }
    }

    if cfg.oauth.code_ttl_secs <= 0 {
        errors.push("oauth.code_ttl_secs must be > 0".to_string());
    }

    if cfg.oauth.access_ttl_secs <= 0 {
        errors.push("oauth.access_ttl_secs must be > 0".to_string());
    }

    if cfg.oauth.refresh_ttl_days <= 0 {
        errors.push("oauth.refresh_ttl_days must be > 0".to_string());
    }

    if cfg.oauth.token_rate_per_minute == 0 {
        errors.push("oauth.token_rate_per_minute must be > 0".to_string());
    }

    if cfg.menu.cache_ttl_secs <= 0 {
        errors.push("menu.cache_ttl_secs must be > 0".to_string());
    }

    if cfg.menu.default_locale.trim().is_empty() {
        errors.push("menu.default_locale must not be empty".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, AuthConfig, DatabaseConfig};

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn rejects_short_admin_password_and_bad_pool_sizes() {
        let mut cfg = AppConfig::default();
        cfg.database = Some(DatabaseConfig {
            url: "postgres://localhost/hemis".to_string(),
            max_connections: 2,
            min_idle: 5,
        });
        cfg.auth = Some(AuthConfig {
            jwt_secret: "secret".to_string(),
            admin_email: "admin@hemis.uz".to_string(),
            admin_password: "short".to_string(),
        });

        let err = validate(&cfg).expect_err("config should be rejected");
        let message = err.to_string();
        assert!(message.contains("admin_password"));
        assert!(message.contains("min_idle"));
    }

    #[test]
    fn rejects_zero_ttls() {
        let mut cfg = AppConfig::default();
        cfg.oauth.code_ttl_secs = 0;
        cfg.menu.cache_ttl_secs = 0;

        let err = validate(&cfg).expect_err("config should be rejected");
        let message = err.to_string();
        assert!(message.contains("code_ttl_secs"));
        assert!(message.contains("cache_ttl_secs"));
    }
}
