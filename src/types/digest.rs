// ABOUTME: Content-addressed image manifest digest.
// ABOUTME: Opaque string newtype so digests can't be confused with tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash identifying one image manifest, e.g. `sha256:ab12...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use = "digests reference images and should not be ignored"]
pub struct ImageDigest(String);

impl ImageDigest {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageDigest {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
