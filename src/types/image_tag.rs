// ABOUTME: Image tag validation following the OCI distribution tag grammar.
// ABOUTME: Tags are 1-128 characters of [A-Za-z0-9_.-], not starting with '.' or '-'.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageTagError {
    #[error("image tag cannot be empty")]
    Empty,

    #[error("image tag exceeds maximum length of 128 characters")]
    TooLong,

    #[error("image tag must start with a letter, digit or underscore")]
    InvalidStart,

    #[error("invalid character in image tag: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(value: &str) -> Result<Self, ImageTagError> {
        let Some(first) = value.chars().next() else {
            return Err(ImageTagError::Empty);
        };

        if value.len() > MAX_LEN {
            return Err(ImageTagError::TooLong);
        }

        if !(first.is_ascii_alphanumeric() || first == '_') {
            return Err(ImageTagError::InvalidStart);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
        {
            return Err(ImageTagError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ImageTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ImageTag::new(&value).map_err(serde::de::Error::custom)
    }
}
