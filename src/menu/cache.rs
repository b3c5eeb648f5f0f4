use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::tree::MenuItem;

/// The role id is part of the key on purpose: keying by user alone serves a
/// stale menu after a role switch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuCacheKey {
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub locale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedMenu {
    pub menu: Vec<MenuItem>,
    pub permissions: Vec<String>,
    pub expires_at: DateTime<FixedOffset>,
}

impl CachedMenu {
    pub fn is_expired(&self, now: DateTime<FixedOffset>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

/// Shared key-value store interface (get/put/forget with TTL). The production
/// deployment can back this with a networked store; `forget_user` is a
/// pattern delete over every (role, locale) combination of one user.
#[async_trait]
pub trait MenuCache: Send + Sync {
    async fn get(&self, key: &MenuCacheKey) -> Result<Option<CachedMenu>, CacheError>;
    async fn put(&self, key: &MenuCacheKey, entry: CachedMenu) -> Result<(), CacheError>;
    async fn forget(&self, key: &MenuCacheKey) -> Result<(), CacheError>;
    async fn forget_user(&self, user_id: &Uuid) -> Result<u64, CacheError>;
}

/// In-process implementation over an RwLock'd map. Entries past their expiry
/// read as misses and are overwritten by the next put.
#[derive(Default)]
pub struct InMemoryMenuCache {
    inner: Arc<RwLock<HashMap<MenuCacheKey, CachedMenu>>>,
}

impl InMemoryMenuCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuCache for InMemoryMenuCache {
    async fn get(&self, key: &MenuCacheKey) -> Result<Option<CachedMenu>, CacheError> {
        let now = chrono::Utc::now().fixed_offset();
        let map = self.inner.read().await;
        Ok(map
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned())
    }

    async fn put(&self, key: &MenuCacheKey, entry: CachedMenu) -> Result<(), CacheError> {
        let mut map = self.inner.write().await;
        map.insert(key.clone(), entry);
        Ok(())
    }

    async fn forget(&self, key: &MenuCacheKey) -> Result<(), CacheError> {
        let mut map = self.inner.write().await;
        map.remove(key);
        Ok(())
    }

    async fn forget_user(&self, user_id: &Uuid) -> Result<u64, CacheError> {
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|key, _| key.user_id != *user_id);
        Ok((before - map.len()) as u64)
    }
}
