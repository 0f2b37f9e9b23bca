// ABOUTME: Registry collaborator: the image/manifest/repository operations the core depends on.
// ABOUTME: Defines the Registry trait, its snapshot records, and the ECR-backed implementation.

mod ecr;
mod types;

pub use ecr::EcrRegistry;
pub use types::{AuthorizationToken, ImageManifest, ImageRecord, RegistryInventory};

use async_trait::async_trait;

use crate::types::{ImageDigest, ImageTag, RepositoryName};

/// Request/response operations against one container registry.
///
/// Implementations report a missing tag as [`RegistryError::ImageNotFound`] so
/// callers can tell "doesn't exist yet" apart from transport or API failures.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Every tagged image in the repository, as one snapshot.
    async fn list_images(
        &self,
        repository: &RepositoryName,
    ) -> Result<RegistryInventory, RegistryError>;

    /// The image currently carrying `tag`.
    async fn describe_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ImageRecord, RegistryError>;

    /// Manifest stored under `digest`, or `None` when the registry has none.
    async fn get_manifest(
        &self,
        repository: &RepositoryName,
        digest: &ImageDigest,
    ) -> Result<Option<ImageManifest>, RegistryError>;

    /// Write `manifest` under `tag`, creating the tag or moving it.
    ///
    /// Returns the digest the tag now points at, if the registry reports one.
    async fn put_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
        manifest: &ImageManifest,
    ) -> Result<Option<ImageDigest>, RegistryError>;

    async fn repository_exists(&self, repository: &RepositoryName) -> Result<bool, RegistryError>;

    async fn create_repository(&self, repository: &RepositoryName) -> Result<(), RegistryError>;

    /// Credentials for pushing with a container CLI.
    async fn authorization_token(&self) -> Result<AuthorizationToken, RegistryError>;
}

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("registry request failed: {0}")]
    Api(String),
}

impl RegistryError {
    pub fn is_image_not_found(&self) -> bool {
        matches!(self, RegistryError::ImageNotFound(_))
    }
}
