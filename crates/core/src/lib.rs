//! Shared primitives for all Rust crates in kindernav.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across kindernav crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist, or the backing store reported no data.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backing store could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error, including malformed payloads.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error only reports missing data.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_displays_raw_value() {
        let value = NonEmptyString::new("guardian").map(|value| value.to_string());
        assert_eq!(value, Ok("guardian".to_owned()));
    }

    #[test]
    fn deserialization_applies_the_same_validation() {
        let blank: Result<NonEmptyString, _> = serde_json::from_str("\"  \"");
        assert!(blank.is_err());

        let value: Result<NonEmptyString, _> = serde_json::from_str("\"guardian\"");
        assert_eq!(
            value.ok().map(String::from),
            Some("guardian".to_owned())
        );
    }

    #[test]
    fn only_not_found_reports_missing_data() {
        assert!(AppError::NotFound("role".to_owned()).is_not_found());
        assert!(!AppError::Unavailable("role".to_owned()).is_not_found());
    }
}
