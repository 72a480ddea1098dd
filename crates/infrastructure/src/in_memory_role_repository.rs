use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use kindernav_application::{ApiEnvelope, RoleRepository};
use kindernav_core::{AppError, AppResult};
use kindernav_domain::{NavigationConfigUpdate, Permission, Role, RoleNavigationConfig};
use tokio::sync::RwLock;

/// In-memory role store.
///
/// A user's permissions are the permissions of the active role assigned to
/// them.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<String, Role>>,
    user_roles: RwLock<HashMap<String, String>>,
    navigation_configs: RwLock<HashMap<String, RoleNavigationConfig>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
            user_roles: RwLock::new(HashMap::new()),
            navigation_configs: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a role, replacing any role with the same id.
    pub async fn save_role(&self, role: Role) {
        self.roles.write().await.insert(role.id().to_owned(), role);
    }

    /// Assigns an existing role to a user.
    pub async fn assign_user_role(&self, user_id: &str, role_id: &str) -> AppResult<()> {
        if !self.roles.read().await.contains_key(role_id) {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        self.user_roles
            .write()
            .await
            .insert(user_id.to_owned(), role_id.to_owned());
        Ok(())
    }

    /// Stores a navigation config, replacing the role's current one.
    pub async fn save_navigation_config(&self, config: RoleNavigationConfig) {
        self.navigation_configs
            .write()
            .await
            .insert(config.role_id().to_owned(), config);
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn fetch_role(&self, role_id: &str) -> AppResult<ApiEnvelope<Role>> {
        Ok(match self.roles.read().await.get(role_id) {
            Some(role) => ApiEnvelope::ok(role.clone()),
            None => ApiEnvelope::failure(format!("role '{role_id}' not found")),
        })
    }

    async fn fetch_all_roles(&self) -> AppResult<ApiEnvelope<Vec<Role>>> {
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(ApiEnvelope::ok(roles))
    }

    async fn fetch_user_permissions(
        &self,
        user_id: &str,
    ) -> AppResult<ApiEnvelope<Vec<Permission>>> {
        let Some(role_id) = self.user_roles.read().await.get(user_id).cloned() else {
            return Ok(ApiEnvelope::failure(format!(
                "user '{user_id}' has no role assignment"
            )));
        };

        let permissions = self
            .roles
            .read()
            .await
            .get(&role_id)
            .filter(|role| role.is_active())
            .map(|role| role.permissions().to_vec())
            .unwrap_or_default();

        Ok(ApiEnvelope::ok(permissions))
    }

    async fn fetch_navigation_config(
        &self,
        role_id: &str,
    ) -> AppResult<ApiEnvelope<RoleNavigationConfig>> {
        Ok(match self.navigation_configs.read().await.get(role_id) {
            Some(config) => ApiEnvelope::ok(config.clone()),
            None => ApiEnvelope::failure(format!("no navigation config for role '{role_id}'")),
        })
    }

    async fn update_navigation_config(
        &self,
        role_id: &str,
        update: NavigationConfigUpdate,
    ) -> AppResult<ApiEnvelope<bool>> {
        let mut configs = self.navigation_configs.write().await;
        let Some(current) = configs.remove(role_id) else {
            return Ok(ApiEnvelope::failure(format!(
                "no navigation config for role '{role_id}'"
            )));
        };

        configs.insert(role_id.to_owned(), current.apply(update, Utc::now()));
        Ok(ApiEnvelope::ok(true))
    }
}
