use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kindernav_core::UserIdentity;
use kindernav_domain::{BadgeValue, RouteDecision, RouteRequirement, UserNavigation};
use tracing::info;

use crate::NavigationService;

#[cfg(test)]
mod tests;

/// Navigation state of the signed-in user.
///
/// Every mutation that can change what the user sees rebuilds the
/// navigation before returning.
pub struct NavigationSession {
    service: NavigationService,
    identity: Option<UserIdentity>,
    navigation: UserNavigation,
    last_updated: Option<DateTime<Utc>>,
}

impl NavigationSession {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new(service: NavigationService) -> Self {
        Self {
            service,
            identity: None,
            navigation: UserNavigation::default(),
            last_updated: None,
        }
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// Returns the last built navigation.
    #[must_use]
    pub fn navigation(&self) -> &UserNavigation {
        &self.navigation
    }

    /// Returns when the navigation was last built.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Returns whether a navigation has been built for the current user.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.last_updated.is_some()
    }

    /// Returns whether the current navigation has any entry.
    #[must_use]
    pub fn has_navigation(&self) -> bool {
        !self.navigation.is_empty()
    }

    /// Rebuilds the navigation for the current user.
    pub async fn load(&mut self) {
        let Some(identity) = self.identity.as_ref() else {
            self.reset_navigation();
            return;
        };

        self.navigation = self
            .service
            .build_user_navigation(identity.user_id(), identity.role_id())
            .await;
        self.last_updated = Some(Utc::now());
    }

    /// Drops the role's cached navigation config, then rebuilds.
    pub async fn refresh(&mut self) {
        if let Some(identity) = self.identity.as_ref() {
            self.service
                .invalidate_navigation_cache(identity.role_id())
                .await;
        }
        self.load().await;
    }

    /// Starts a session for `identity` with fresh permissions.
    pub async fn sign_in(&mut self, identity: UserIdentity) {
        self.service
            .permission_service()
            .invalidate_user_cache(identity.user_id())
            .await;
        info!(
            user_id = %identity.user_id(),
            role_id = %identity.role_id(),
            "navigation session started"
        );
        self.identity = Some(identity);
        self.load().await;
    }

    /// Moves the signed-in user to another role. Returns `false` when no
    /// user is signed in.
    pub async fn switch_role(&mut self, role_id: &str) -> bool {
        let Some(identity) = self.identity.as_ref() else {
            return false;
        };

        let switched = identity.with_role(role_id);
        self.service
            .permission_service()
            .invalidate_user_cache(switched.user_id())
            .await;
        self.service.invalidate_navigation_cache(role_id).await;
        info!(
            user_id = %switched.user_id(),
            from_role = %identity.role_id(),
            to_role = %role_id,
            "navigation session switched role"
        );

        self.identity = Some(switched);
        self.load().await;
        true
    }

    /// Ends the session and drops every cached permission, navigation
    /// config and badge value at both cache levels.
    pub async fn sign_out(&mut self) {
        self.service.permission_service().clear_all_cache().await;
        self.service.clear_cache().await;
        if let Some(identity) = self.identity.take() {
            info!(user_id = %identity.user_id(), "navigation session ended");
        }
        self.reset_navigation();
    }

    /// Sets one badge value for the current user and rebuilds.
    pub async fn set_badge(&mut self, source: &str, value: impl Into<BadgeValue>) {
        let Some(identity) = self.identity.as_ref() else {
            return;
        };

        self.service
            .set_badge_data(identity.user_id(), source, value)
            .await;
        self.load().await;
    }

    /// Merges badge values for the current user and rebuilds.
    pub async fn update_badges(&mut self, values: HashMap<String, BadgeValue>) {
        let Some(identity) = self.identity.as_ref() else {
            return;
        };

        self.service
            .update_badge_data(identity.user_id(), values)
            .await;
        self.load().await;
    }

    /// Returns whether the current user holds `permission`. Signed out
    /// means no.
    pub async fn has_permission(&self, permission: &str) -> bool {
        let Some(identity) = self.identity.as_ref() else {
            return false;
        };

        self.service
            .permission_service()
            .check_permission(identity.user_id(), permission)
            .await
    }

    /// Returns whether the current user holds one of `permissions`.
    ///
    /// Signed out or an empty list means no.
    pub async fn has_any_permission(&self, permissions: &[String]) -> bool {
        let Some(identity) = self.identity.as_ref() else {
            return false;
        };
        if permissions.is_empty() {
            return false;
        }

        self.service
            .permission_service()
            .check_any_permission(identity.user_id(), permissions)
            .await
    }

    /// Returns whether the current user holds all of `permissions`.
    ///
    /// Signed out or an empty list means yes.
    pub async fn has_all_permissions(&self, permissions: &[String]) -> bool {
        let Some(identity) = self.identity.as_ref() else {
            return true;
        };
        if permissions.is_empty() {
            return true;
        }

        self.service
            .permission_service()
            .check_all_permissions(identity.user_id(), permissions)
            .await
    }

    /// Returns whether the current user may open `route`.
    pub async fn can_access_route(&self, route: &str, required_permissions: &[String]) -> bool {
        if required_permissions.is_empty() {
            return true;
        }
        let Some(identity) = self.identity.as_ref() else {
            return false;
        };

        self.service
            .can_access_route(identity.user_id(), route, required_permissions)
            .await
    }

    /// Evaluates a route guard for the current user.
    pub async fn evaluate_route(&self, requirement: &RouteRequirement) -> RouteDecision {
        let check = match self.identity.as_ref() {
            Some(identity) => Some(
                self.service
                    .permission_service()
                    .get_user_permission_check(identity.user_id(), identity.role_id())
                    .await,
            ),
            None => None,
        };

        requirement.evaluate(self.identity.as_ref(), check.as_ref())
    }

    fn reset_navigation(&mut self) {
        self.navigation = UserNavigation::default();
        self.last_updated = None;
    }
}
