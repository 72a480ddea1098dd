use async_trait::async_trait;
use kindernav_core::{AppError, AppResult};
use kindernav_domain::{NavigationConfigUpdate, Permission, Role, RoleNavigationConfig};
use serde::{Deserialize, Serialize};

/// Response envelope returned by the role backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Payload, present on success.
    pub data: Option<T>,
    /// Whether the store considered the request successful.
    pub success: bool,
    /// Optional explanation, usually set on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Creates a successful envelope.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: None,
        }
    }

    /// Creates an unsuccessful envelope.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            message: Some(message.into()),
        }
    }

    /// Unwraps the payload.
    ///
    /// `success = false` is reported as not found; a successful envelope
    /// without payload is malformed.
    pub fn into_data(self, what: &str) -> AppResult<T> {
        if !self.success {
            return Err(AppError::NotFound(match self.message {
                Some(message) => format!("{what}: {message}"),
                None => what.to_owned(),
            }));
        }

        self.data
            .ok_or_else(|| AppError::Internal(format!("{what}: successful response without data")))
    }
}

/// Backing store port for roles, permissions and navigation configs.
///
/// Transport failures are reported as `Err`; "no data" is reported through
/// the envelope.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Fetches one role by id.
    async fn fetch_role(&self, role_id: &str) -> AppResult<ApiEnvelope<Role>>;

    /// Fetches every role.
    async fn fetch_all_roles(&self) -> AppResult<ApiEnvelope<Vec<Role>>>;

    /// Fetches the effective permissions of a user.
    async fn fetch_user_permissions(&self, user_id: &str) -> AppResult<ApiEnvelope<Vec<Permission>>>;

    /// Fetches the navigation config of a role.
    async fn fetch_navigation_config(
        &self,
        role_id: &str,
    ) -> AppResult<ApiEnvelope<RoleNavigationConfig>>;

    /// Applies a partial navigation config update.
    async fn update_navigation_config(
        &self,
        role_id: &str,
        update: NavigationConfigUpdate,
    ) -> AppResult<ApiEnvelope<bool>>;
}
