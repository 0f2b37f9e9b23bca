// ABOUTME: Applies a stage tag by copying the source image's manifest under the stage tag.
// ABOUTME: Skips the registry write when the stage tag already points at the source digest.

use tracing::{debug, info, warn};

use crate::registry::{Registry, RegistryError};
use crate::types::{ImageDigest, ImageTag, RepositoryName};

use super::{StageTagRequest, StageTaggingResult, TagDecision, TagError};

/// Stage tagger over a registry.
pub struct StageTagger<'a, R: Registry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: Registry + ?Sized> StageTagger<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Point `stage_tag` at the image currently under `source_tag`.
    ///
    /// Only the stage tag pointer moves. The digest it moves away from keeps
    /// its content and its other tags.
    pub async fn tag_with_stage(
        &self,
        request: &StageTagRequest,
    ) -> Result<StageTaggingResult, TagError> {
        let StageTagRequest {
            repository,
            source_tag,
            stage_tag,
        } = request;

        info!(
            repository = %repository,
            source_tag = %source_tag,
            stage_tag = %stage_tag,
            "Starting ECR image tagging"
        );

        let target = self.source_digest(repository, source_tag).await?;
        info!(repository = %repository, tag = %source_tag, digest = %target, "Found image");

        let current = self.current_digest(repository, stage_tag).await;
        match TagDecision::for_digests(current.as_ref(), &target) {
            TagDecision::AlreadyApplied => {
                info!(
                    stage_tag = %stage_tag,
                    digest = %target,
                    "Tag already exists on the image, skipping tagging"
                );
                return Ok(result(target, stage_tag, repository));
            }
            TagDecision::Move { from: Some(from) } => {
                info!(stage_tag = %stage_tag, from = %from, to = %target, "Moving stage tag");
            }
            TagDecision::Move { from: None } => {
                debug!(stage_tag = %stage_tag, "Stage tag not present yet");
            }
        }

        let manifest = self
            .registry
            .get_manifest(repository, &target)
            .await?
            .ok_or_else(|| TagError::ManifestNotFound {
                digest: target.to_string(),
            })?;

        let applied = self
            .registry
            .put_image(repository, stage_tag, &manifest)
            .await?
            .ok_or_else(|| TagError::TagApplyFailed {
                tag: stage_tag.to_string(),
            })?;

        info!(
            repository = %repository,
            stage_tag = %stage_tag,
            digest = %applied,
            "Successfully tagged image"
        );
        Ok(result(applied, stage_tag, repository))
    }

    async fn source_digest(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ImageDigest, TagError> {
        match self.registry.describe_image(repository, tag).await {
            Ok(record) => Ok(record.digest),
            Err(RegistryError::ImageNotFound(_)) => Err(TagError::SourceImageNotFound {
                repository: repository.to_string(),
                tag: tag.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    // Lookup failures other than "not found" are downgraded to "no match" so
    // tagging proceeds. A transient error can cause a redundant tag move.
    async fn current_digest(
        &self,
        repository: &RepositoryName,
        stage_tag: &ImageTag,
    ) -> Option<ImageDigest> {
        match self.registry.describe_image(repository, stage_tag).await {
            Ok(record) => Some(record.digest),
            Err(err) if err.is_image_not_found() => None,
            Err(err) => {
                warn!(
                    error = %err,
                    "Error checking if tag exists, proceeding with tagging"
                );
                None
            }
        }
    }
}

fn result(
    digest: ImageDigest,
    stage_tag: &ImageTag,
    repository: &RepositoryName,
) -> StageTaggingResult {
    StageTaggingResult {
        image_digest: digest,
        stage_tag: stage_tag.to_string(),
        repository_name: repository.to_string(),
    }
}
