use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::MenuConfig;

use super::{
    cache::{CachedMenu, InMemoryMenuCache, MenuCache, MenuCacheKey},
    filter::filter_menu,
    translate::Translations,
    tree::{MenuItem, default_menu, load_menu_file},
};

#[derive(Debug, Serialize)]
pub struct MenuView {
    pub menu: Vec<MenuItem>,
    pub permissions: Vec<String>,
    pub locale: String,
    pub cached: bool,
    pub cache_expires_at: DateTime<FixedOffset>,
}

/// Filter then translate, with no cache involvement: same inputs, same
/// output.
pub fn compute_menu(
    tree: &[MenuItem],
    permissions: &[String],
    translations: &Translations,
    locale: &str,
) -> Vec<MenuItem> {
    let mut filtered = filter_menu(tree, permissions);
    translate_labels(&mut filtered, translations, locale);
    filtered
}

fn translate_labels(items: &mut [MenuItem], translations: &Translations, locale: &str) {
    for item in items {
        item.label = translations.resolve(&item.label, locale);
        translate_labels(&mut item.children, translations, locale);
    }
}

/// Cache-aside wrapper around `compute_menu`, keyed by (user, role, locale).
/// A broken cache store degrades to recomputing on every call instead of
/// failing the request.
#[derive(Clone)]
pub struct MenuService {
    tree: Arc<Vec<MenuItem>>,
    translations: Arc<Translations>,
    cache: Arc<dyn MenuCache>,
    cache_ttl: Duration,
}

impl MenuService {
    pub fn from_config(cfg: &MenuConfig) -> anyhow::Result<Self> {
        let tree = match cfg.file.as_deref() {
            Some(path) => load_menu_file(path)?,
            None => default_menu(),
        };
        let translations = match cfg.translations_dir.as_deref() {
            Some(dir) => Translations::load_dir(dir)?,
            None => Translations::default_tables(),
        };
        Ok(Self::with_parts(
            tree,
            translations,
            Arc::new(InMemoryMenuCache::new()),
            cfg.cache_ttl_secs,
        ))
    }

    pub fn with_parts(
        tree: Vec<MenuItem>,
        translations: Translations,
        cache: Arc<dyn MenuCache>,
        cache_ttl_secs: i64,
    ) -> Self {
        Self {
            tree: Arc::new(tree),
            translations: Arc::new(translations),
            cache,
            cache_ttl: Duration::seconds(cache_ttl_secs),
        }
    }

    pub async fn menu_for_user(
        &self,
        user_id: &Uuid,
        role_id: &Uuid,
        permissions: &[String],
        locale: &str,
    ) -> MenuView {
        let key = MenuCacheKey {
            user_id: *user_id,
            role_id: *role_id,
            locale: locale.to_string(),
        };

        match self.cache.get(&key).await {
            Ok(Some(entry)) => {
                return MenuView {
                    menu: entry.menu,
                    permissions: entry.permissions,
                    locale: locale.to_string(),
                    cached: true,
                    cache_expires_at: entry.expires_at,
                };
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "menu cache read failed, recomputing");
            }
        }

        let menu = compute_menu(&self.tree, permissions, &self.translations, locale);
        let expires_at = Utc::now().fixed_offset() + self.cache_ttl;
        let entry = CachedMenu {
            menu: menu.clone(),
            permissions: permissions.to_vec(),
            expires_at,
        };
        if let Err(err) = self.cache.put(&key, entry).await {
            tracing::warn!(error = %err, "menu cache write failed, serving uncached");
        }

        MenuView {
            menu,
            permissions: permissions.to_vec(),
            locale: locale.to_string(),
            cached: false,
            cache_expires_at: expires_at,
        }
    }

    /// Drop every cached menu of the user, across all roles and locales. Run
    /// after any permission-affecting event (role switch, permission edit).
    pub async fn invalidate_user(&self, user_id: &Uuid) -> u64 {
        match self.cache.forget_user(user_id).await {
            Ok(removed) => removed,
            Err(err) => {
                tracing::warn!(error = %err, "menu cache invalidation failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::menu::cache::{CacheError, CachedMenu, InMemoryMenuCache, MenuCache, MenuCacheKey};
    use crate::menu::translate::Translations;
    use crate::menu::tree::{MenuItem, default_menu};

    use super::MenuService;

    fn service() -> MenuService {
        MenuService::with_parts(
            default_menu(),
            Translations::default_tables(),
            Arc::new(InMemoryMenuCache::new()),
            3180,
        )
    }

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let service = service();
        let user = Uuid::new_v4();
        let role = Uuid::new_v4();

        let cold = service
            .menu_for_user(&user, &role, &perms(&["report.*"]), "uz")
            .await;
        assert!(!cold.cached);

        let warm = service
            .menu_for_user(&user, &role, &perms(&["report.*"]), "uz")
            .await;
        assert!(warm.cached);
        assert_eq!(warm.menu, cold.menu);
        assert_eq!(warm.permissions, cold.permissions);
    }

    #[tokio::test]
    async fn role_switch_never_reuses_the_previous_roles_menu() {
        let service = service();
        let user = Uuid::new_v4();
        let staff_role = Uuid::new_v4();
        let student_role = Uuid::new_v4();

        let staff_view = service
            .menu_for_user(&user, &staff_role, &perms(&["student.*", "report.*"]), "uz")
            .await;
        assert!(staff_view.menu.iter().any(|item| item.id == "students"));

        let student_view = service
            .menu_for_user(&user, &student_role, &perms(&[]), "uz")
            .await;
        assert!(!student_view.cached);
        assert!(student_view.menu.iter().all(|item| item.id != "students"));
    }

    #[tokio::test]
    async fn invalidation_clears_all_locales_and_roles() {
        let service = service();
        let user = Uuid::new_v4();
        let role = Uuid::new_v4();

        service.menu_for_user(&user, &role, &perms(&["*"]), "uz").await;
        service.menu_for_user(&user, &role, &perms(&["*"]), "ru").await;

        let removed = service.invalidate_user(&user).await;
        assert_eq!(removed, 2);

        let after = service.menu_for_user(&user, &role, &perms(&["*"]), "uz").await;
        assert!(!after.cached);
    }

    #[tokio::test]
    async fn labels_are_translated_with_fallback() {
        let service = service();
        let view = service
            .menu_for_user(&Uuid::new_v4(), &Uuid::new_v4(), &perms(&["*"]), "ru")
            .await;

        let dashboard = view
            .menu
            .iter()
            .find(|item| item.id == "dashboard")
            .expect("dashboard should be visible");
        assert_eq!(dashboard.label, "Панель управления");
    }

    struct BrokenCache;

    #[async_trait]
    impl MenuCache for BrokenCache {
        async fn get(&self, _key: &MenuCacheKey) -> Result<Option<CachedMenu>, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn put(&self, _key: &MenuCacheKey, _entry: CachedMenu) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn forget(&self, _key: &MenuCacheKey) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn forget_user(&self, _user_id: &Uuid) -> Result<u64, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn broken_cache_degrades_to_recompute() {
        let service = MenuService::with_parts(
            default_menu(),
            Translations::default_tables(),
            Arc::new(BrokenCache),
            3180,
        );

        let view = service
            .menu_for_user(&Uuid::new_v4(), &Uuid::new_v4(), &perms(&["report.*"]), "uz")
            .await;
        assert!(!view.cached);
        assert!(view.menu.iter().any(|item| item.id == "reports"));

        assert_eq!(service.invalidate_user(&Uuid::new_v4()).await, 0);
    }

    #[tokio::test]
    async fn expired_cache_entries_trigger_recompute() {
        let service = MenuService::with_parts(
            vec![MenuItem::new("dashboard", "menu.dashboard").with_url("/dashboard")],
            Translations::default_tables(),
            Arc::new(InMemoryMenuCache::new()),
            0,
        );
        let user = Uuid::new_v4();
        let role = Uuid::new_v4();

        service.menu_for_user(&user, &role, &perms(&[]), "uz").await;
        let again = service.menu_for_user(&user, &role, &perms(&[]), "uz").await;
        assert!(!again.cached);
    }
}
