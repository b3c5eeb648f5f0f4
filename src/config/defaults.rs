pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;

pub const DEFAULT_CODE_TTL_SECS: i64 = 10 * 60;
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;
pub const DEFAULT_TOKEN_RATE_PER_MINUTE: i64 = 60;

pub const DEFAULT_MENU_CACHE_TTL_SECS: i64 = 53 * 60;
pub const DEFAULT_LOCALE: &str = "uz";
