use std::env;
use std::time::Duration;

use kindernav_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Runtime configuration of the navigator binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Base URL of the role backing store; the seeded in-memory store is
    /// used when absent.
    pub role_directory_url: Option<Url>,
    /// Request timeout for the role backing store.
    pub role_directory_timeout: Duration,
    /// User the navigation is built for.
    pub user_id: String,
    /// Role the user acts under.
    pub role_id: String,
}

impl NavigatorConfig {
    /// Loads the configuration from the process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let role_directory_url = optional_value(&lookup, "ROLE_DIRECTORY_URL")
            .map(|value| {
                Url::parse(value.as_str()).map_err(|error| {
                    AppError::Validation(format!(
                        "invalid ROLE_DIRECTORY_URL value '{value}': {error}"
                    ))
                })
            })
            .transpose()?;

        let timeout_ms = parse_u64(&lookup, "ROLE_DIRECTORY_TIMEOUT_MS", 5000)?;
        if timeout_ms == 0 {
            return Err(AppError::Validation(
                "ROLE_DIRECTORY_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        let user_id =
            optional_value(&lookup, "NAVIGATOR_USER_ID").unwrap_or_else(|| "dev-user".to_owned());
        let role_id =
            optional_value(&lookup, "NAVIGATOR_ROLE_ID").unwrap_or_else(|| "guardian".to_owned());

        Ok(Self {
            role_directory_url,
            role_directory_timeout: Duration::from_millis(timeout_ms),
            user_id,
            role_id,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_value<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_u64<F>(lookup: &F, name: &str, default: u64) -> AppResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match optional_value(lookup, name) {
        Some(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
