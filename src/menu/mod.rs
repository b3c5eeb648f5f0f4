pub mod cache;
pub mod filter;
mod service;
pub mod translate;
pub mod tree;

pub use cache::{CacheError, CachedMenu, InMemoryMenuCache, MenuCache, MenuCacheKey};
pub use filter::{filter_menu, path_grants, permission_grants};
pub use service::{MenuService, MenuView, compute_menu};
pub use translate::Translations;
pub use tree::MenuItem;
