// ABOUTME: ECR repository name validation.
// ABOUTME: Lowercase path components joined by '/', separators '.', '_' and '-' inside components.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryNameError {
    #[error("repository name cannot be empty")]
    Empty,

    #[error("repository name must be at least 2 characters")]
    TooShort,

    #[error("repository name exceeds maximum length of 256 characters")]
    TooLong,

    #[error("repository name must be lowercase")]
    NotLowercase,

    #[error("invalid character in repository name: '{0}'")]
    InvalidChar(char),

    #[error("invalid path component in repository name: '{0}'")]
    InvalidComponent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub fn new(value: &str) -> Result<Self, RepositoryNameError> {
        if value.is_empty() {
            return Err(RepositoryNameError::Empty);
        }

        if value.len() < MIN_LEN {
            return Err(RepositoryNameError::TooShort);
        }

        if value.len() > MAX_LEN {
            return Err(RepositoryNameError::TooLong);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(RepositoryNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '.' | '_' | '-' | '/')
            {
                return Err(RepositoryNameError::InvalidChar(c));
            }
        }

        for component in value.split('/') {
            if !is_valid_component(component) {
                return Err(RepositoryNameError::InvalidComponent(component.to_string()));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A component is alphanumeric runs separated by single `.`, `_` or `-`.
fn is_valid_component(component: &str) -> bool {
    let mut previous_was_separator = true;
    for c in component.chars() {
        let is_separator = matches!(c, '.' | '_' | '-');
        if is_separator && previous_was_separator {
            return false;
        }
        previous_was_separator = is_separator;
    }
    !component.is_empty() && !previous_was_separator
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RepositoryName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        RepositoryName::new(&value).map_err(serde::de::Error::custom)
    }
}
