//! Cache-first access to roles, user permissions and navigation configs.

use std::collections::BTreeSet;
use std::sync::Arc;

use kindernav_core::{AppError, AppResult};
use kindernav_domain::{NavigationConfigUpdate, Permission, Role, RoleNavigationConfig};
use tracing::{debug, warn};

use crate::{RoleRepository, TtlCache};

#[cfg(test)]
mod tests;

const ALL_ROLES_KEY: &str = "all-roles";

#[derive(Default)]
struct DirectoryCaches {
    roles: TtlCache<String, Role>,
    all_roles: TtlCache<&'static str, Vec<Role>>,
    user_permissions: TtlCache<String, Arc<Vec<Permission>>>,
    navigation_configs: TtlCache<String, Arc<RoleNavigationConfig>>,
}

/// Source of truth for roles, permissions and role navigation configs.
///
/// Reads are cache-first with [`crate::CACHE_TTL`]. Every public read
/// degrades to "no data" instead of failing. Permission ids are unique
/// within every list handed out.
#[derive(Clone)]
pub struct RoleDirectory {
    repository: Arc<dyn RoleRepository>,
    caches: Arc<DirectoryCaches>,
}

impl RoleDirectory {
    /// Creates a directory over a backing store.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            repository,
            caches: Arc::new(DirectoryCaches::default()),
        }
    }

    /// Returns a role by id.
    pub async fn get_role_by_id(&self, role_id: &str) -> Option<Role> {
        let result = self
            .caches
            .roles
            .get_or_try_fetch(role_id.to_owned(), || async {
                self.repository
                    .fetch_role(role_id)
                    .await?
                    .into_data(&format!("role '{role_id}'"))
                    .map(Role::with_unique_permissions)
            })
            .await;

        degrade(result, "get_role_by_id", role_id)
    }

    /// Returns every role, or an empty list when none can be loaded.
    pub async fn get_all_roles(&self) -> Vec<Role> {
        let result = self
            .caches
            .all_roles
            .get_or_try_fetch(ALL_ROLES_KEY, || async {
                let roles = self.repository.fetch_all_roles().await?.into_data("roles")?;
                Ok(roles
                    .into_iter()
                    .map(Role::with_unique_permissions)
                    .collect())
            })
            .await;

        degrade(result, "get_all_roles", ALL_ROLES_KEY).unwrap_or_default()
    }

    /// Returns the user's permissions, or an empty list when none can be
    /// loaded.
    pub async fn get_user_permissions(&self, user_id: &str) -> Vec<Permission> {
        degrade(
            self.load_user_permissions(user_id).await,
            "get_user_permissions",
            user_id,
        )
        .map(|permissions| permissions.as_ref().clone())
        .unwrap_or_default()
    }

    /// Returns the role's navigation config.
    pub async fn get_role_navigation_config(
        &self,
        role_id: &str,
    ) -> Option<Arc<RoleNavigationConfig>> {
        degrade(
            self.load_role_navigation_config(role_id).await,
            "get_role_navigation_config",
            role_id,
        )
    }

    /// Sends a partial navigation config update to the backing store.
    ///
    /// Only this role's cached navigation config is invalidated. Returns the
    /// store's success flag, `false` on transport failure.
    pub async fn update_role_navigation_config(
        &self,
        role_id: &str,
        update: NavigationConfigUpdate,
    ) -> bool {
        match self
            .repository
            .update_navigation_config(role_id, update)
            .await
        {
            Ok(envelope) => {
                self.invalidate_navigation_config(role_id).await;
                if !envelope.success {
                    warn!(
                        role_id = %role_id,
                        reason = envelope.message.as_deref().unwrap_or_default(),
                        "navigation config update rejected"
                    );
                }
                envelope.success
            }
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "navigation config update failed");
                false
            }
        }
    }

    /// Drops the cached navigation config of one role.
    pub async fn invalidate_navigation_config(&self, role_id: &str) {
        if self.caches.navigation_configs.invalidate(role_id).await {
            debug!(role_id = %role_id, "invalidated cached navigation config");
        }
    }

    /// Drops the cached permissions of one user.
    pub async fn invalidate_user_permissions(&self, user_id: &str) {
        if self.caches.user_permissions.invalidate(user_id).await {
            debug!(user_id = %user_id, "invalidated cached user permissions");
        }
    }

    /// Drops every cached entry.
    pub async fn clear_cache(&self) {
        self.caches.roles.clear().await;
        self.caches.all_roles.clear().await;
        self.caches.user_permissions.clear().await;
        self.caches.navigation_configs.clear().await;
        debug!("cleared role directory cache");
    }

    /// Loads permissions without degrading errors, deduplicated by id.
    pub(crate) async fn load_user_permissions(
        &self,
        user_id: &str,
    ) -> AppResult<Arc<Vec<Permission>>> {
        self.caches
            .user_permissions
            .get_or_try_fetch(user_id.to_owned(), || async {
                let permissions = self
                    .repository
                    .fetch_user_permissions(user_id)
                    .await?
                    .into_data(&format!("permissions of user '{user_id}'"))?;
                Ok(Arc::new(unique_by_id(permissions)))
            })
            .await
    }

    pub(crate) async fn load_role_navigation_config(
        &self,
        role_id: &str,
    ) -> AppResult<Arc<RoleNavigationConfig>> {
        self.caches
            .navigation_configs
            .get_or_try_fetch(role_id.to_owned(), || async {
                let config = self
                    .repository
                    .fetch_navigation_config(role_id)
                    .await?
                    .into_data(&format!("navigation config of role '{role_id}'"))?;

                if config.role_id() != role_id {
                    return Err(AppError::Internal(format!(
                        "navigation config for role '{role_id}' belongs to role '{}'",
                        config.role_id()
                    )));
                }

                let duplicates = config.duplicate_sibling_ids();
                if !duplicates.is_empty() {
                    warn!(
                        role_id = %role_id,
                        duplicates = ?duplicates,
                        "navigation config repeats item ids among siblings"
                    );
                }

                Ok(Arc::new(config))
            })
            .await
    }
}

fn unique_by_id(permissions: Vec<Permission>) -> Vec<Permission> {
    let mut seen = BTreeSet::new();
    permissions
        .into_iter()
        .filter(|permission| seen.insert(permission.id().to_owned()))
        .collect()
}

/// Converts a lookup failure into "no data", logging anything other than a
/// plain miss.
pub(crate) fn degrade<T>(result: AppResult<T>, operation: &'static str, key: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) if error.is_not_found() => {
            debug!(operation, key = %key, error = %error, "no data in role directory");
            None
        }
        Err(error) => {
            warn!(operation, key = %key, error = %error, "role directory lookup failed");
            None
        }
    }
}
