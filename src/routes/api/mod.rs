pub mod admin;
pub mod auth;
pub mod menu;
pub mod public;
mod router;

pub use router::router;
