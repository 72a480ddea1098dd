use serde::{Deserialize, Serialize};

/// Signed-in user as seen by the navigation engine.
///
/// Token issuance and validation happen upstream; this is only the resolved
/// subject and the role it is acting under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: String,
    display_name: String,
    role_id: String,
}

impl UserIdentity {
    /// Creates a user identity from an authenticated subject and its role.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role_id: role_id.into(),
        }
    }

    /// Returns the stable user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role the user is currently acting under.
    #[must_use]
    pub fn role_id(&self) -> &str {
        self.role_id.as_str()
    }

    /// Returns a copy of this identity acting under another role.
    #[must_use]
    pub fn with_role(&self, role_id: impl Into<String>) -> Self {
        Self {
            user_id: self.user_id.clone(),
            display_name: self.display_name.clone(),
            role_id: role_id.into(),
        }
    }
}
