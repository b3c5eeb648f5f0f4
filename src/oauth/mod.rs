pub mod error;
pub mod rate_limit;
pub mod secret;
mod service;

pub use error::OAuthError;
pub use rate_limit::RateLimiter;
pub use service::{TokenGrant, TokenService};
