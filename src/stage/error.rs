// ABOUTME: Stage tagging errors.
// ABOUTME: All are fatal to one tagging call; the custom resource layer turns them into FAILED responses.

use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("No image found with tag {tag} in repository {repository}")]
    SourceImageNotFound { repository: String, tag: String },

    #[error("No manifest found for image with digest {digest}")]
    ManifestNotFound { digest: String },

    #[error("Failed to get image digest from put response for tag {tag}")]
    TagApplyFailed { tag: String },

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagErrorKind {
    SourceImageNotFound,
    ManifestNotFound,
    TagApplyFailed,
    RepositoryUnavailable,
}

impl TagError {
    pub fn kind(&self) -> TagErrorKind {
        match self {
            TagError::SourceImageNotFound { .. } => TagErrorKind::SourceImageNotFound,
            TagError::ManifestNotFound { .. } => TagErrorKind::ManifestNotFound,
            TagError::TagApplyFailed { .. } => TagErrorKind::TagApplyFailed,
            TagError::Registry(_) => TagErrorKind::RepositoryUnavailable,
        }
    }
}
