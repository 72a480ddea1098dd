use std::collections::BTreeSet;

use kindernav_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Grantable capability identified by a stable id such as `view:dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    id: NonEmptyString,
    name: String,
    description: String,
    resource: String,
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conditions: Option<Map<String, Value>>,
}

impl Permission {
    /// Creates a validated permission.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            name: name.into(),
            description: description.into(),
            resource: resource.into(),
            action: action.into(),
            conditions: None,
        })
    }

    /// Creates a permission from an `action:resource` id, deriving the other
    /// fields from it.
    ///
    /// `view:dashboard` becomes name `View Dashboard`, action `view` and
    /// resource `dashboard`. An id without `:` keeps the whole id as action
    /// and uses `unknown` as resource.
    pub fn from_id(id: impl Into<String>) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;
        let spaced = id.as_str().replacen(':', " ", 1);
        let mut segments = id.as_str().split(':');
        let action = segments
            .next()
            .filter(|value| !value.is_empty())
            .unwrap_or("unknown")
            .to_owned();
        let resource = segments
            .next()
            .filter(|value| !value.is_empty())
            .unwrap_or("unknown")
            .to_owned();

        Ok(Self {
            name: title_case_words(spaced.as_str()),
            description: format!("Permission to {spaced}"),
            id,
            resource,
            action,
            conditions: None,
        })
    }

    /// Attaches free-form conditions evaluated by downstream policy code.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Map<String, Value>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Returns the stable permission id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the human readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the guarded resource.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the guarded action.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Returns optional conditions.
    #[must_use]
    pub fn conditions(&self) -> Option<&Map<String, Value>> {
        self.conditions.as_ref()
    }
}

fn title_case_words(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_word = false;
    for character in value.chars() {
        let is_word = character.is_ascii_alphanumeric() || character == '_';
        if is_word && !previous_is_word {
            result.extend(character.to_uppercase());
        } else {
            result.push(character);
        }
        previous_is_word = is_word;
    }
    result
}

/// Effective permission set of one user acting under one role.
///
/// Recomputed per request from the cached permission list; never persisted.
/// All predicates are pure over the held permission ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionCheck {
    user_id: String,
    role_id: String,
    permissions: BTreeSet<String>,
}

impl UserPermissionCheck {
    /// Creates a permission check from raw permission ids.
    #[must_use]
    pub fn new<I, S>(user_id: impl Into<String>, role_id: impl Into<String>, permission_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            role_id: role_id.into(),
            permissions: permission_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a permission check from resolved permissions.
    #[must_use]
    pub fn from_permissions(
        user_id: impl Into<String>,
        role_id: impl Into<String>,
        permissions: &[Permission],
    ) -> Self {
        Self::new(
            user_id,
            role_id,
            permissions.iter().map(|permission| permission.id().to_owned()),
        )
    }

    /// Creates a check that holds no permissions.
    #[must_use]
    pub fn denied(user_id: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self::new(user_id, role_id, std::iter::empty::<String>())
    }

    /// Returns the user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the role id.
    #[must_use]
    pub fn role_id(&self) -> &str {
        self.role_id.as_str()
    }

    /// Returns the held permission ids in sorted order.
    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }

    /// Returns whether no permission is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns whether `permission` is held.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns whether at least one of `permissions` is held.
    ///
    /// An empty list is never satisfied.
    #[must_use]
    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions
            .iter()
            .any(|permission| self.has_permission(permission.as_ref()))
    }

    /// Returns whether every one of `permissions` is held.
    ///
    /// An empty list is always satisfied.
    #[must_use]
    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions
            .iter()
            .all(|permission| self.has_permission(permission.as_ref()))
    }
}

/// Checks route-level requirements: every required permission must be held.
#[must_use]
pub fn validate_route_permissions<R: AsRef<str>, H: AsRef<str>>(required: &[R], held: &[H]) -> bool {
    required
        .iter()
        .all(|permission| held.iter().any(|value| value.as_ref() == permission.as_ref()))
}

/// Checks component-level requirements: one required permission is enough,
/// and no requirement means visible.
#[must_use]
pub fn validate_component_permissions<R: AsRef<str>, H: AsRef<str>>(
    required: &[R],
    held: &[H],
) -> bool {
    required.is_empty()
        || required
            .iter()
            .any(|permission| held.iter().any(|value| value.as_ref() == permission.as_ref()))
}
