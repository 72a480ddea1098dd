//! Builds per-user navigation trees from role navigation configs.

use std::collections::HashMap;
use std::sync::Arc;

use kindernav_domain::{
    BadgeValue, NavigationCategory, NavigationConfigUpdate, NavigationItem, RoleNavigationConfig,
    UserNavigation, UserPermissionCheck,
};
use tracing::{debug, warn};

use crate::role_directory::degrade;
use crate::{BadgeStore, PermissionService, RoleDirectory, TtlCache};

mod badges;
mod categorize;
mod filter;


/// Navigation builder with its own navigation-level config cache and the
/// per-user badge store.
#[derive(Clone)]
pub struct NavigationService {
    directory: RoleDirectory,
    permissions: PermissionService,
    cache: Arc<TtlCache<String, Arc<RoleNavigationConfig>>>,
    badges: Arc<BadgeStore>,
}

impl NavigationService {
    /// Creates a navigation service over a directory and a permission
    /// resolver.
    #[must_use]
    pub fn new(directory: RoleDirectory, permissions: PermissionService) -> Self {
        Self {
            directory,
            permissions,
            cache: Arc::new(TtlCache::new()),
            badges: Arc::new(BadgeStore::new()),
        }
    }

    /// Returns the permission resolver used for gating.
    #[must_use]
    pub fn permission_service(&self) -> &PermissionService {
        &self.permissions
    }

    /// Returns the role's raw navigation config, cache-first.
    pub async fn get_navigation_config(&self, role_id: &str) -> Option<Arc<RoleNavigationConfig>> {
        let result = self
            .cache
            .get_or_try_fetch(role_id.to_owned(), || {
                self.directory.load_role_navigation_config(role_id)
            })
            .await;

        degrade(result, "get_navigation_config", role_id)
    }

    /// Builds the filtered, ordered and badge-resolved navigation of a user
    /// acting under a role.
    ///
    /// A role without navigation config yields three empty lists.
    pub async fn build_user_navigation(&self, user_id: &str, role_id: &str) -> UserNavigation {
        let check = self
            .permissions
            .get_user_permission_check(user_id, role_id)
            .await;

        let Some(config) = self.get_navigation_config(role_id).await else {
            warn!(
                user_id = %user_id,
                role_id = %role_id,
                "no navigation config for role, rendering empty navigation"
            );
            return UserNavigation::default();
        };

        let badges = self.badges.snapshot(user_id).await;
        let navigation = build_navigation(config.navigation_items(), &check, &badges);

        debug!(
            user_id = %user_id,
            role_id = %role_id,
            primary = navigation.primary.len(),
            secondary = navigation.secondary.len(),
            applications = navigation.applications.len(),
            "built user navigation"
        );
        navigation
    }

    /// Returns whether the user may open `route`.
    ///
    /// No requirement means open; otherwise one held permission is enough.
    pub async fn can_access_route(
        &self,
        user_id: &str,
        route: &str,
        required_permissions: &[String],
    ) -> bool {
        if required_permissions.is_empty() {
            return true;
        }

        let allowed = self
            .permissions
            .check_any_permission(user_id, required_permissions)
            .await;
        if !allowed {
            debug!(user_id = %user_id, route = %route, "route access denied");
        }
        allowed
    }

    /// Sets one badge value for a user.
    pub async fn set_badge_data(&self, user_id: &str, source: &str, value: impl Into<BadgeValue>) {
        self.badges.set(user_id, source, value).await;
    }

    /// Merges several badge values for a user.
    pub async fn update_badge_data(&self, user_id: &str, values: HashMap<String, BadgeValue>) {
        self.badges.update(user_id, values).await;
    }

    /// Returns a snapshot of a user's badge values.
    pub async fn badge_data(&self, user_id: &str) -> HashMap<String, BadgeValue> {
        self.badges.snapshot(user_id).await
    }

    /// Drops every badge value of one user.
    pub async fn clear_user_badges(&self, user_id: &str) {
        self.badges.clear_user(user_id).await;
    }

    /// Forwards a partial config update and drops the role's cached config
    /// at both cache levels.
    pub async fn update_role_navigation_config(
        &self,
        role_id: &str,
        update: NavigationConfigUpdate,
    ) -> bool {
        let updated = self
            .directory
            .update_role_navigation_config(role_id, update)
            .await;
        self.cache.invalidate(role_id).await;
        updated
    }

    /// Drops the role's cached navigation config at both cache levels.
    pub async fn invalidate_navigation_cache(&self, role_id: &str) {
        self.cache.invalidate(role_id).await;
        self.directory.invalidate_navigation_config(role_id).await;
        debug!(role_id = %role_id, "invalidated navigation cache");
    }

    /// Drops every cached navigation config at both cache levels, the
    /// directory's cached roles and permissions, and all badge data.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        self.directory.clear_cache().await;
        self.badges.clear().await;
        debug!("cleared navigation cache and badge data");
    }
}

/// Categorizes, orders, filters and badge-resolves a raw item list.
pub(crate) fn build_navigation(
    items: &[NavigationItem],
    check: &UserPermissionCheck,
    badges: &HashMap<String, BadgeValue>,
) -> UserNavigation {
    let mut navigation = categorize::categorize(items);
    for category in [
        NavigationCategory::Primary,
        NavigationCategory::Secondary,
        NavigationCategory::Application,
    ] {
        let bucket = navigation.bucket_mut(category);
        let items = std::mem::take(bucket);
        *bucket = filter::filter_items(items, check, badges);
    }
    navigation
}
