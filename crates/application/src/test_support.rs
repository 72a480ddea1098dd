use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use kindernav_core::{AppError, AppResult};
use kindernav_domain::{
    LayoutSettings, NavigationBadge, NavigationConfigUpdate, NavigationItem, Permission, Role,
    RoleNavigationConfig,
};
use tokio::sync::Mutex;

use crate::{ApiEnvelope, RoleRepository};

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

pub(crate) fn permissions(ids: &[&str]) -> Vec<Permission> {
    ids.iter()
        .filter_map(|id| Permission::from_id(*id).ok())
        .collect()
}

pub(crate) fn item(id: &str, order: i32, required: &[&str]) -> NavigationItem {
    NavigationItem::new(id, id, "pi pi-circle", order)
        .map(|item| {
            item.with_route(format!("/{id}"))
                .with_required_permissions(required.iter().copied())
        })
        .unwrap_or_else(|error| panic!("invalid test item '{id}': {error}"))
}

pub(crate) fn config(role_id: &str, items: Vec<NavigationItem>) -> RoleNavigationConfig {
    RoleNavigationConfig::new(role_id, items, LayoutSettings::default(), fixed_time())
        .unwrap_or_else(|error| panic!("invalid test config '{role_id}': {error}"))
}

/// Guardian config used by the navigation scenarios.
pub(crate) fn guardian_config() -> RoleNavigationConfig {
    config(
        "guardian",
        vec![
            item("messages", 3, &["view:messages"])
                .with_badge(NavigationBadge::dynamic("unreadMessages")),
            item("payments", 2, &["view:payments"]),
            item("dashboard", 1, &["view:dashboard"]),
        ],
    )
}

#[derive(Default)]
pub(crate) struct CallCounts {
    pub(crate) roles: AtomicUsize,
    pub(crate) all_roles: AtomicUsize,
    pub(crate) user_permissions: AtomicUsize,
    pub(crate) navigation_configs: AtomicUsize,
    pub(crate) updates: AtomicUsize,
}

/// Role store fake with call counters and a switch that makes every call
/// fail like an unreachable backend.
#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    roles: Mutex<HashMap<String, Role>>,
    user_permissions: Mutex<HashMap<String, Vec<Permission>>>,
    navigation_configs: Mutex<HashMap<String, RoleNavigationConfig>>,
    unreachable: AtomicBool,
    pub(crate) calls: CallCounts,
}

impl FakeRoleRepository {
    pub(crate) async fn with_role(self, role: Role) -> Self {
        self.roles.lock().await.insert(role.id().to_owned(), role);
        self
    }

    pub(crate) async fn with_user_permissions(self, user_id: &str, ids: &[&str]) -> Self {
        self.user_permissions
            .lock()
            .await
            .insert(user_id.to_owned(), permissions(ids));
        self
    }

    pub(crate) async fn with_navigation_config(self, config: RoleNavigationConfig) -> Self {
        self.navigation_configs
            .lock()
            .await
            .insert(config.role_id().to_owned(), config);
        self
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn reachable(&self) -> AppResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("role store unreachable".to_owned()));
        }
        Ok(())
    }

    pub(crate) fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn envelope<T>(value: Option<T>, missing: &str) -> ApiEnvelope<T> {
    match value {
        Some(value) => ApiEnvelope::ok(value),
        None => ApiEnvelope::failure(missing),
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn fetch_role(&self, role_id: &str) -> AppResult<ApiEnvelope<Role>> {
        self.calls.roles.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(envelope(
            self.roles.lock().await.get(role_id).cloned(),
            "role not found",
        ))
    }

    async fn fetch_all_roles(&self) -> AppResult<ApiEnvelope<Vec<Role>>> {
        self.calls.all_roles.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        let mut roles: Vec<Role> = self.roles.lock().await.values().cloned().collect();
        roles.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(ApiEnvelope::ok(roles))
    }

    async fn fetch_user_permissions(
        &self,
        user_id: &str,
    ) -> AppResult<ApiEnvelope<Vec<Permission>>> {
        self.calls.user_permissions.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(envelope(
            self.user_permissions.lock().await.get(user_id).cloned(),
            "user not found",
        ))
    }

    async fn fetch_navigation_config(
        &self,
        role_id: &str,
    ) -> AppResult<ApiEnvelope<RoleNavigationConfig>> {
        self.calls.navigation_configs.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(envelope(
            self.navigation_configs.lock().await.get(role_id).cloned(),
            "navigation config not found",
        ))
    }

    async fn update_navigation_config(
        &self,
        role_id: &str,
        update: NavigationConfigUpdate,
    ) -> AppResult<ApiEnvelope<bool>> {
        self.calls.updates.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        let mut configs = self.navigation_configs.lock().await;
        let Some(current) = configs.remove(role_id) else {
            return Ok(ApiEnvelope::failure("navigation config not found"));
        };
        configs.insert(role_id.to_owned(), current.apply(update, fixed_time()));
        Ok(ApiEnvelope::ok(true))
    }
}
