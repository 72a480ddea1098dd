use async_trait::async_trait;
use kindernav_application::{ApiEnvelope, RoleRepository};
use kindernav_core::{AppError, AppResult};
use kindernav_domain::{NavigationConfigUpdate, Permission, Role, RoleNavigationConfig};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// REST client for the role backing store.
///
/// Endpoints live under the configured base URL:
/// `roles`, `roles/{id}`, `roles/{id}/navigation` and
/// `users/{id}/permissions`.
pub struct HttpRoleRepository {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpRoleRepository {
    /// Creates a repository for the store at `base_url`.
    ///
    /// The base URL must be hierarchical (`https://host/api`).
    pub fn new(http_client: reqwest::Client, base_url: Url) -> AppResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "role directory url '{base_url}' cannot be used as a base url"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "role directory url '{}' cannot be used as a base url",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        what: &str,
    ) -> AppResult<ApiEnvelope<T>> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "fetching {what}");

        let response = self.http_client.get(url).send().await.map_err(|error| {
            AppError::Unavailable(format!("{what} request transport error: {error}"))
        })?;

        read_envelope(response, what).await
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> AppResult<ApiEnvelope<T>> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!("{what} does not exist")));
    }
    if !status.is_success() {
        return Err(AppError::Unavailable(format!(
            "{what} request failed with status {status}"
        )));
    }

    response
        .json::<ApiEnvelope<T>>()
        .await
        .map_err(|error| AppError::Internal(format!("{what} response is malformed: {error}")))
}

#[async_trait]
impl RoleRepository for HttpRoleRepository {
    async fn fetch_role(&self, role_id: &str) -> AppResult<ApiEnvelope<Role>> {
        self.get_envelope(&["roles", role_id], "role").await
    }

    async fn fetch_all_roles(&self) -> AppResult<ApiEnvelope<Vec<Role>>> {
        self.get_envelope(&["roles"], "role list").await
    }

    async fn fetch_user_permissions(
        &self,
        user_id: &str,
    ) -> AppResult<ApiEnvelope<Vec<Permission>>> {
        self.get_envelope(&["users", user_id, "permissions"], "user permissions")
            .await
    }

    async fn fetch_navigation_config(
        &self,
        role_id: &str,
    ) -> AppResult<ApiEnvelope<RoleNavigationConfig>> {
        self.get_envelope(&["roles", role_id, "navigation"], "navigation config")
            .await
    }

    async fn update_navigation_config(
        &self,
        role_id: &str,
        update: NavigationConfigUpdate,
    ) -> AppResult<ApiEnvelope<bool>> {
        let url = self.endpoint(&["roles", role_id, "navigation"])?;
        debug!(url = %url, "updating navigation config");

        let response = self
            .http_client
            .put(url)
            .json(&update)
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!(
                    "navigation config update transport error: {error}"
                ))
            })?;

        read_envelope(response, "navigation config update").await
    }
}

#[cfg(test)]
mod tests {
    use kindernav_core::AppError;
    use url::Url;

    use super::HttpRoleRepository;

    fn repository(base: &str) -> Option<HttpRoleRepository> {
        let base_url = Url::parse(base).ok()?;
        HttpRoleRepository::new(reqwest::Client::new(), base_url).ok()
    }

    #[test]
    fn endpoints_extend_base_path() {
        let Some(repository) = repository("https://kommune.example/api/") else {
            panic!("base url should be accepted");
        };

        let url = repository.endpoint(&["roles", "guardian", "navigation"]);
        assert_eq!(
            url.map(|url| url.to_string()),
            Ok("https://kommune.example/api/roles/guardian/navigation".to_owned())
        );
    }

    #[test]
    fn path_segments_are_escaped() {
        let Some(repository) = repository("https://kommune.example/api") else {
            panic!("base url should be accepted");
        };

        let url = repository.endpoint(&["users", "a/b c", "permissions"]);
        assert_eq!(
            url.map(|url| url.to_string()),
            Ok("https://kommune.example/api/users/a%2Fb%20c/permissions".to_owned())
        );
    }

    #[test]
    fn opaque_base_url_is_rejected() {
        let result = Url::parse("mailto:roles@kommune.example")
            .map_err(|error| AppError::Validation(error.to_string()))
            .and_then(|url| HttpRoleRepository::new(reqwest::Client::new(), url));

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
