// ABOUTME: Read-only snapshot records returned by registry queries.
// ABOUTME: Image records, manifests, and push credentials.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::types::ImageDigest;

/// One image's tag set at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub digest: ImageDigest,
    pub tags: Vec<String>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// All tagged images of one repository from a single inventory query.
///
/// Digests are unique within a snapshot and each tag appears on at most one record.
pub type RegistryInventory = Vec<ImageRecord>;

/// Image manifest document, copied verbatim when a tag is moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageManifest {
    pub body: String,
    pub media_type: Option<String>,
}

impl ImageManifest {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            media_type: None,
        }
    }
}

/// Decoded registry login credentials.
#[derive(Clone)]
pub struct AuthorizationToken {
    pub username: String,
    pub password: String,
    /// Registry endpoint, usually with an `https://` scheme.
    pub endpoint: String,
}

impl AuthorizationToken {
    /// Endpoint without its scheme, as container CLIs expect in image references.
    pub fn registry_host(&self) -> &str {
        self.endpoint
            .strip_prefix("https://")
            .or_else(|| self.endpoint.strip_prefix("http://"))
            .unwrap_or(&self.endpoint)
    }
}

impl fmt::Debug for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationToken")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(endpoint: &str) -> AuthorizationToken {
        AuthorizationToken {
            username: "AWS".to_string(),
            password: "secret".to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    #[test]
    fn registry_host_strips_scheme() {
        assert_eq!(
            token("https://123.dkr.ecr.eu-west-1.amazonaws.com").registry_host(),
            "123.dkr.ecr.eu-west-1.amazonaws.com"
        );
        assert_eq!(token("localhost:5000").registry_host(), "localhost:5000");
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", token("https://example.com"));
        assert!(!rendered.contains("secret"));
    }
}
