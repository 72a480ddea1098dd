use std::sync::Arc;

use kindernav_domain::{Permission, UserPermissionCheck};
use tracing::{debug, warn};

use crate::{RoleDirectory, TtlCache};


/// Resolves a user's effective permission set.
///
/// Permission lists are cached per user, independently of the role the user
/// is acting under. A lookup that fails resolves to no permissions and is not
/// cached.
#[derive(Clone)]
pub struct PermissionService {
    directory: RoleDirectory,
    cache: Arc<TtlCache<String, Arc<Vec<Permission>>>>,
}

impl PermissionService {
    /// Creates a permission service reading from the role directory.
    #[must_use]
    pub fn new(directory: RoleDirectory) -> Self {
        Self {
            directory,
            cache: Arc::new(TtlCache::new()),
        }
    }

    /// Returns the permission check value for a user acting under a role.
    pub async fn get_user_permission_check(
        &self,
        user_id: &str,
        role_id: &str,
    ) -> UserPermissionCheck {
        let permissions = self.user_permissions(user_id).await;
        UserPermissionCheck::from_permissions(user_id, role_id, &permissions)
    }

    /// Returns whether the user holds `permission`.
    pub async fn check_permission(&self, user_id: &str, permission: &str) -> bool {
        self.user_permissions(user_id)
            .await
            .iter()
            .any(|value| value.id() == permission)
    }

    /// Returns whether the user holds at least one of `permissions`.
    pub async fn check_any_permission<S: AsRef<str> + Sync>(
        &self,
        user_id: &str,
        permissions: &[S],
    ) -> bool {
        self.get_user_permission_check(user_id, "")
            .await
            .has_any_permission(permissions)
    }

    /// Returns whether the user holds every one of `permissions`.
    pub async fn check_all_permissions<S: AsRef<str> + Sync>(
        &self,
        user_id: &str,
        permissions: &[S],
    ) -> bool {
        self.get_user_permission_check(user_id, "")
            .await
            .has_all_permissions(permissions)
    }

    /// Drops the cached permissions of one user, here and in the directory.
    pub async fn invalidate_user_cache(&self, user_id: &str) {
        self.cache.invalidate(user_id).await;
        self.directory.invalidate_user_permissions(user_id).await;
        debug!(user_id = %user_id, "invalidated user permission cache");
    }

    /// Drops every cached permission list.
    pub async fn clear_all_cache(&self) {
        self.cache.clear().await;
        debug!("cleared permission cache");
    }

    async fn user_permissions(&self, user_id: &str) -> Arc<Vec<Permission>> {
        let result = self
            .cache
            .get_or_try_fetch(user_id.to_owned(), || {
                self.directory.load_user_permissions(user_id)
            })
            .await;

        match result {
            Ok(permissions) => permissions,
            Err(error) => {
                if error.is_not_found() {
                    debug!(user_id = %user_id, error = %error, "no permissions found for user");
                } else {
                    warn!(
                        user_id = %user_id,
                        error = %error,
                        "permission lookup failed, treating user as holding no permissions"
                    );
                }
                Arc::new(Vec::new())
            }
        }
    }
}
