use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kindernav_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role snapshot with its owned permission list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    id: NonEmptyString,
    name: String,
    display_name: String,
    description: String,
    permissions: Vec<Permission>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a validated active role.
    ///
    /// Permission ids must be unique within the role.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        permissions: Vec<Permission>,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;

        let mut seen = BTreeSet::new();
        for permission in &permissions {
            if !seen.insert(permission.id()) {
                return Err(AppError::Validation(format!(
                    "permission '{}' is listed more than once for role '{}'",
                    permission.id(),
                    id
                )));
            }
        }

        Ok(Self {
            name: id.as_str().to_owned(),
            id,
            display_name: display_name.into(),
            description: description.into(),
            permissions,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns this role with repeated permission ids removed, keeping the
    /// first occurrence.
    #[must_use]
    pub fn with_unique_permissions(mut self) -> Self {
        let mut seen = BTreeSet::new();
        self.permissions
            .retain(|permission| seen.insert(permission.id().to_owned()));
        self
    }

    /// Returns a copy of this role marked inactive.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns the stable role id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the role's machine name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the role display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the permissions owned by this role snapshot.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Returns whether the role is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Roles known to the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    /// Parent or guardian of enrolled children.
    Guardian,
    /// Municipal case worker.
    Caseworker,
    /// Portal administrator.
    Admin,
    /// Kindergarten staff.
    Staff,
    /// External partner organisation.
    Partner,
    /// District-level administrator.
    DistrictAdmin,
    /// Kindergarten educator.
    Educator,
}

impl UserRole {
    /// Returns the stable role id.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guardian => "guardian",
            Self::Caseworker => "caseworker",
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Partner => "partner",
            Self::DistrictAdmin => "district-admin",
            Self::Educator => "educator",
        }
    }

    /// Returns the landing route for users in this role.
    #[must_use]
    pub fn home_route(&self) -> &'static str {
        match self {
            Self::Guardian => "/guardian",
            Self::Caseworker => "/caseworker",
            Self::Admin => "/admin",
            Self::Staff => "/staff",
            Self::Partner => "/partner",
            Self::DistrictAdmin => "/district-admin",
            Self::Educator => "/educator",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[UserRole] = &[
            UserRole::Guardian,
            UserRole::Caseworker,
            UserRole::Admin,
            UserRole::Staff,
            UserRole::Partner,
            UserRole::DistrictAdmin,
            UserRole::Educator,
        ];

        ALL
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role value '{value}'")))
    }
}

/// Returns the landing route for a raw role id, `/` for unknown roles.
#[must_use]
pub fn home_route_for(role_id: &str) -> &'static str {
    UserRole::from_str(role_id)
        .map(|role| role.home_route())
        .unwrap_or("/")
}
