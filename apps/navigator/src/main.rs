//! Navigator entrypoint: builds role-based navigation and permission
//! decisions against the configured role store and prints them as JSON.

mod navigator_config;

use std::env;
use std::sync::Arc;

use kindernav_application::{
    NavigationService, PermissionService, RoleDirectory, RoleRepository,
};
use kindernav_core::{AppError, AppResult};
use kindernav_infrastructure::{HttpRoleRepository, InMemoryRoleRepository};
use serde::Serialize;
use tracing::info;

use crate::navigator_config::{NavigatorConfig, init_tracing};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Navigation,
    Permissions(Vec<String>),
    Route(Vec<String>),
    Roles,
}

impl Command {
    fn parse<I>(mut args: I) -> AppResult<Self>
    where
        I: Iterator<Item = String>,
    {
        match args.next().as_deref() {
            None | Some("navigation") => Ok(Self::Navigation),
            Some("permissions") => Ok(Self::Permissions(args.collect())),
            Some("route") => Ok(Self::Route(args.collect())),
            Some("roles") => Ok(Self::Roles),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected navigation, permissions, route or roles"
            ))),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionReport {
    user_id: String,
    role_id: String,
    held: Vec<String>,
    requested: Vec<(String, bool)>,
    has_any: bool,
    has_all: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteReport {
    route: String,
    required_permissions: Vec<String>,
    allowed: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = NavigatorConfig::load()?;
    let command = Command::parse(env::args().skip(1))?;
    let repository = build_repository(&config).await?;

    let directory = RoleDirectory::new(repository);
    let permissions = PermissionService::new(directory.clone());
    let navigation = NavigationService::new(directory.clone(), permissions.clone());

    info!(
        user_id = %config.user_id,
        role_id = %config.role_id,
        remote_store = config.role_directory_url.is_some(),
        "kindernav-navigator started"
    );

    match command {
        Command::Navigation => {
            let user_navigation = navigation
                .build_user_navigation(&config.user_id, &config.role_id)
                .await;
            print_json(&user_navigation)
        }
        Command::Permissions(requested) => {
            let check = permissions
                .get_user_permission_check(&config.user_id, &config.role_id)
                .await;
            print_json(&PermissionReport {
                user_id: check.user_id().to_owned(),
                role_id: check.role_id().to_owned(),
                held: check.permissions().map(ToOwned::to_owned).collect(),
                requested: requested
                    .iter()
                    .map(|permission| (permission.clone(), check.has_permission(permission)))
                    .collect(),
                has_any: check.has_any_permission(&requested),
                has_all: check.has_all_permissions(&requested),
            })
        }
        Command::Route(mut arguments) => {
            if arguments.is_empty() {
                return Err(AppError::Validation(
                    "route command requires a route path".to_owned(),
                ));
            }
            let route = arguments.remove(0);
            let allowed = navigation
                .can_access_route(&config.user_id, &route, &arguments)
                .await;
            print_json(&RouteReport {
                route,
                required_permissions: arguments,
                allowed,
            })
        }
        Command::Roles => print_json(&directory.get_all_roles().await),
    }
}

async fn build_repository(config: &NavigatorConfig) -> AppResult<Arc<dyn RoleRepository>> {
    match &config.role_directory_url {
        Some(base_url) => {
            let http_client = reqwest::Client::builder()
                .timeout(config.role_directory_timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            Ok(Arc::new(HttpRoleRepository::new(
                http_client,
                base_url.clone(),
            )?))
        }
        None => Ok(Arc::new(InMemoryRoleRepository::with_development_data().await?)),
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}
