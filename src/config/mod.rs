mod configs;
pub mod defaults;
mod envconfig;
mod validate;

pub use configs::{
    AppConfig, AuthConfig, DatabaseConfig, GeneralConfig, LoggingConfig, MenuConfig, OAuthConfig,
};
pub use envconfig::EnvConfig;
