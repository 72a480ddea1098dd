use kindernav_core::UserIdentity;
use serde::{Deserialize, Serialize};

use crate::{UserPermissionCheck, home_route_for};

/// Access rules attached to a routed page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequirement {
    /// Signed-in user required.
    #[serde(default)]
    pub requires_auth: bool,
    /// Only reachable while signed out (login, registration).
    #[serde(default)]
    pub guest_only: bool,
    /// Exact role required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_role: Option<String>,
    /// Roles allowed; empty means any role.
    #[serde(default)]
    pub allowed_roles: Vec<String>,
    /// Permissions of which at least one must be held; empty means none.
    #[serde(default)]
    pub required_permissions: Vec<String>,
}

/// Outcome of evaluating a route requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "path", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Navigation may proceed.
    Allow,
    /// Send the user to the login page.
    RedirectToLogin,
    /// Send the user to the portal home page.
    RedirectToHome,
    /// Send the user to a specific path.
    RedirectTo(String),
}

impl RouteRequirement {
    /// Creates a requirement for signed-in users only.
    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            ..Self::default()
        }
    }

    /// Creates a requirement for signed-out users only.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            guest_only: true,
            ..Self::default()
        }
    }

    /// Requires an exact role.
    #[must_use]
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.required_role = Some(role_id.into());
        self
    }

    /// Restricts the route to a set of roles.
    #[must_use]
    pub fn with_allowed_roles<I, S>(mut self, role_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = role_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Requires at least one of the given permissions.
    #[must_use]
    pub fn with_required_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    fn needs_identity(&self) -> bool {
        self.requires_auth
            || self.required_role.is_some()
            || !self.allowed_roles.is_empty()
            || !self.required_permissions.is_empty()
    }

    /// Evaluates the requirement for the current user.
    ///
    /// Missing permission data is treated as holding nothing.
    #[must_use]
    pub fn evaluate(
        &self,
        identity: Option<&UserIdentity>,
        permissions: Option<&UserPermissionCheck>,
    ) -> RouteDecision {
        if self.guest_only {
            return match identity {
                Some(identity) => {
                    RouteDecision::RedirectTo(home_route_for(identity.role_id()).to_owned())
                }
                None => RouteDecision::Allow,
            };
        }

        let Some(identity) = identity else {
            return if self.needs_identity() {
                RouteDecision::RedirectToLogin
            } else {
                RouteDecision::Allow
            };
        };

        if self
            .required_role
            .as_deref()
            .is_some_and(|role_id| role_id != identity.role_id())
        {
            return RouteDecision::RedirectToHome;
        }

        if !self.allowed_roles.is_empty()
            && !self
                .allowed_roles
                .iter()
                .any(|role_id| role_id == identity.role_id())
        {
            return RouteDecision::RedirectToHome;
        }

        if !self.required_permissions.is_empty()
            && !permissions
                .is_some_and(|check| check.has_any_permission(&self.required_permissions))
        {
            return RouteDecision::RedirectToHome;
        }

        RouteDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use kindernav_core::UserIdentity;

    use super::{RouteDecision, RouteRequirement};
    use crate::UserPermissionCheck;

    fn guardian() -> UserIdentity {
        UserIdentity::new("u1", "Kari", "guardian")
    }

    #[test]
    fn anonymous_user_is_sent_to_login() {
        let requirement = RouteRequirement::authenticated();
        assert_eq!(requirement.evaluate(None, None), RouteDecision::RedirectToLogin);
    }

    #[test]
    fn public_route_allows_anonymous_user() {
        assert_eq!(
            RouteRequirement::default().evaluate(None, None),
            RouteDecision::Allow
        );
    }

    #[test]
    fn role_mismatch_is_sent_home() {
        let identity = guardian();
        let requirement = RouteRequirement::authenticated().with_role("caseworker");
        assert_eq!(
            requirement.evaluate(Some(&identity), None),
            RouteDecision::RedirectToHome
        );
    }

    #[test]
    fn allowed_roles_admit_listed_role() {
        let identity = guardian();
        let requirement =
            RouteRequirement::authenticated().with_allowed_roles(["guardian", "educator"]);
        assert_eq!(requirement.evaluate(Some(&identity), None), RouteDecision::Allow);
    }

    #[test]
    fn signed_in_guest_is_sent_to_role_home() {
        let identity = guardian();
        assert_eq!(
            RouteRequirement::guest().evaluate(Some(&identity), None),
            RouteDecision::RedirectTo("/guardian".to_owned())
        );
    }

    #[test]
    fn permission_gate_uses_any_of() {
        let identity = guardian();
        let check = UserPermissionCheck::new("u1", "guardian", ["view:messages"]);
        let requirement = RouteRequirement::authenticated()
            .with_required_permissions(["view:payments", "view:messages"]);

        assert_eq!(
            requirement.evaluate(Some(&identity), Some(&check)),
            RouteDecision::Allow
        );
        assert_eq!(
            requirement.evaluate(Some(&identity), None),
            RouteDecision::RedirectToHome
        );
    }
}
