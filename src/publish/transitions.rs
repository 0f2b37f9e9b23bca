// ABOUTME: State transition methods for the publish pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::Utc;
use snafu::{ResultExt, ensure};
use tracing::{debug, info};

use crate::hooks::{HookPipeline, HookSlot};
use crate::process::{BuildRequest, ContainerCli};
use crate::version::{BASELINE_VERSION, bump, resolve_latest};

use super::Release;
use super::confirm::Confirmer;
use super::error::{
    BuildSnafu, CancelledSnafu, ConfirmSnafu, CredentialsSnafu, InventorySnafu, PublishError,
    PushSnafu, RepositorySnafu,
};
use super::state::{Built, Initialized, Published, RepositoryReady, VersionBumped, VersionResolved};

// =============================================================================
// Initialized -> RepositoryReady
// =============================================================================

impl Release<Initialized> {
    /// Make sure the target repository exists, creating it if absent.
    ///
    /// In dry run the repository is only checked; a missing one is reported
    /// and left missing.
    pub async fn ensure_repository(self) -> Result<Release<RepositoryReady>, PublishError> {
        let repository = self.repository().clone();
        let registry = self.context.registry.clone();

        let exists = registry
            .repository_exists(&repository)
            .await
            .context(RepositorySnafu {
                repository: repository.to_string(),
            })?;

        if exists {
            debug!("Repository {} exists", repository);
            return Ok(self.transition(RepositoryReady { exists: true }));
        }

        if self.is_dry_run() {
            info!("Dry run: would create repository {}", repository);
            return Ok(self.transition(RepositoryReady { exists: false }));
        }

        info!("Creating repository {}", repository);
        registry
            .create_repository(&repository)
            .await
            .context(RepositorySnafu {
                repository: repository.to_string(),
            })?;

        Ok(self.transition(RepositoryReady { exists: true }))
    }
}

// =============================================================================
// RepositoryReady -> VersionResolved
// =============================================================================

impl Release<RepositoryReady> {
    /// Find the latest released version in the repository.
    ///
    /// A repository without version tags (or one that doesn't exist yet in a
    /// dry run) resolves to no version, meaning a first release.
    pub async fn resolve_version(mut self) -> Result<Release<VersionResolved>, PublishError> {
        let latest = if self.state.exists {
            let inventory = self
                .context
                .registry
                .list_images(&self.context.repository)
                .await
                .context(InventorySnafu {
                    repository: self.context.repository.to_string(),
                })?;
            resolve_latest(&inventory, &self.context.options.version_prefix)
        } else {
            None
        };

        match &latest {
            Some(found) => info!(
                tag = %found.tag,
                digest = %found.digest,
                "Current version is {}",
                found.version
            ),
            None => info!("No version found, starting from {}", BASELINE_VERSION),
        }

        self.context.current_version = latest.as_ref().map(|l| l.version.clone());
        self.context.current_tag = latest.as_ref().map(|l| l.tag.clone());
        Ok(self.transition(VersionResolved { latest }))
    }
}

// =============================================================================
// VersionResolved -> VersionBumped
// =============================================================================

impl Release<VersionResolved> {
    /// Compute the new version and store it, prefixed, in the context.
    ///
    /// Hotfix releases bump from their base version, so `1.2.3.hf2` with a
    /// patch bump becomes `1.2.4`.
    pub fn bump_version(mut self) -> Result<Release<VersionBumped>, PublishError> {
        let current = self
            .context
            .current_version
            .as_ref()
            .map(|v| v.base_version().to_string())
            .unwrap_or_else(|| BASELINE_VERSION.to_string());

        let next = bump(&current, self.context.options.bump)?;
        self.context.new_version = format!("{}{}", self.context.options.version_prefix, next);

        info!("New version: {}", self.context.new_version);
        Ok(self.transition(VersionBumped))
    }
}

// =============================================================================
// VersionBumped -> Built
// =============================================================================

impl Release<VersionBumped> {
    /// Run one hook slot, adopting whatever context the hooks return.
    pub async fn run_hooks(
        mut self,
        hooks: &HookPipeline,
        slot: HookSlot,
    ) -> Result<Release<VersionBumped>, PublishError> {
        self.context = hooks.run(slot, self.context).await?;
        Ok(self)
    }

    /// Build the image, bracketed by the pre-build and post-build hooks.
    ///
    /// The hooks run in dry run too; only the build process is skipped.
    /// Outside dry run the build waits for `confirmer` to approve it.
    pub async fn build<C, F>(
        self,
        cli: &C,
        hooks: &HookPipeline,
        confirmer: &F,
    ) -> Result<Release<Built>, PublishError>
    where
        C: ContainerCli + ?Sized,
        F: Confirmer + ?Sized,
    {
        let release = self.run_hooks(hooks, HookSlot::PreBuild).await?;

        let request = BuildRequest {
            image: release.context.local_image(),
            version: release.context.new_version.clone(),
            context: release.context.options.context.clone(),
            extra_args: release.context.options.build_args.clone(),
        };

        if release.is_dry_run() {
            info!(
                "Dry run: would build {} with args {:?}",
                request.image,
                request.to_args(Utc::now())
            );
        } else {
            confirm_step(confirmer, "Do you want to build the image?", "build").await?;
            info!("Building image {}", request.image);
            cli.build(&request).await.context(BuildSnafu)?;
        }

        let release = release.run_hooks(hooks, HookSlot::PostBuild).await?;
        // Post-build hooks may have changed the version; tag what was built.
        Ok(release.transition(Built {
            local_image: request.image,
        }))
    }
}

// =============================================================================
// Built -> Published
// =============================================================================

impl Release<Built> {
    /// Log in to the registry, tag the local image for it, and push once
    /// `confirmer` approves.
    pub async fn push<C, F>(
        self,
        cli: &C,
        confirmer: &F,
    ) -> Result<Release<Published>, PublishError>
    where
        C: ContainerCli + ?Sized,
        F: Confirmer + ?Sized,
    {
        let local_image = self.state.local_image.clone();

        if self.is_dry_run() {
            info!("Dry run: skipping push of {}", local_image);
            return Ok(self.transition(Published {
                local_image,
                remote_image: None,
            }));
        }

        let token = self
            .context
            .registry
            .authorization_token()
            .await
            .context(CredentialsSnafu)?;
        cli.login(&token).await.context(PushSnafu)?;

        let remote_image = format!(
            "{}/{}:{}",
            token.registry_host(),
            self.context.repository,
            self.context.new_version
        );
        cli.tag(&local_image, &remote_image)
            .await
            .context(PushSnafu)?;

        confirm_step(confirmer, "Do you want to push the image to ECR?", "push").await?;
        info!("Pushing {}", remote_image);
        cli.push(&remote_image).await.context(PushSnafu)?;

        Ok(self.transition(Published {
            local_image,
            remote_image: Some(remote_image),
        }))
    }
}

async fn confirm_step<F: Confirmer + ?Sized>(
    confirmer: &F,
    prompt: &str,
    step: &str,
) -> Result<(), PublishError> {
    let approved = confirmer
        .confirm(prompt)
        .await
        .context(ConfirmSnafu { step })?;
    ensure!(approved, CancelledSnafu { step });
    Ok(())
}
