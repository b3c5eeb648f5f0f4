#[allow(unused_imports)]
pub mod prelude {
    pub use super::access_token::Entity as AccessToken;
    pub use super::auth_code::Entity as AuthCode;
    pub use super::oauth_client::Entity as OAuthClient;
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::role::Entity as Role;
    pub use super::user::Entity as User;
}

pub mod access_token;
pub mod auth_code;
pub mod oauth_client;
pub mod refresh_token;
pub mod role;
pub mod user;
