// ABOUTME: Publisher composes registry, container CLI, and hooks into one publish run.
// ABOUTME: Hooks are registered fluently before the run and fire in FIFO order per slot.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::hooks::{Hook, HookPipeline, HookSlot};
use crate::process::ContainerCli;
use crate::registry::Registry;
use crate::types::RepositoryName;

use super::{AutoConfirm, Confirmer, PublishContext, PublishError, PublishOptions, Release};

/// Summary of a completed publish run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub repository: String,
    /// Tag of the release this one was bumped from.
    pub previous_version: Option<String>,
    pub version: String,
    pub local_image: String,
    /// Pushed reference, absent in dry run.
    pub remote_image: Option<String>,
    pub dry_run: bool,
}

pub struct Publisher {
    registry: Arc<dyn Registry>,
    cli: Arc<dyn ContainerCli>,
    confirmer: Arc<dyn Confirmer>,
    hooks: HookPipeline,
}

impl Publisher {
    pub fn new(registry: Arc<dyn Registry>, cli: Arc<dyn ContainerCli>) -> Self {
        Self {
            registry,
            cli,
            confirmer: Arc::new(AutoConfirm),
            hooks: HookPipeline::new(),
        }
    }

    /// Ask `confirmer` before building and before pushing.
    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn after_version_bump(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.register(HookSlot::PostVersionBump, hook);
        self
    }

    pub fn before_build(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.register(HookSlot::PreBuild, hook);
        self
    }

    pub fn after_build(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.register(HookSlot::PostBuild, hook);
        self
    }

    /// Register hook scripts from the project directory.
    ///
    /// Call before adding programmatic hooks so scripts run first.
    pub fn with_script_hooks(mut self, project_dir: &Path) -> Self {
        self.hooks.discover_scripts(project_dir);
        self
    }

    pub fn hooks(&self) -> &HookPipeline {
        &self.hooks
    }

    /// Run one publish: ensure repository, resolve, bump, hooks, build, push.
    ///
    /// Fails fast on the first error. Nothing is pushed unless every earlier
    /// step succeeded.
    pub async fn publish(
        &self,
        repository: RepositoryName,
        options: PublishOptions,
    ) -> Result<PublishOutcome, PublishError> {
        info!(
            repository = %repository,
            bump = %options.bump,
            dry_run = options.dry_run,
            "Starting publish"
        );

        let context = PublishContext::new(self.registry.clone(), repository, options);

        let resolved = Release::new(context)
            .ensure_repository()
            .await?
            .resolve_version()
            .await?;
        let previous_version = resolved.latest().map(|l| l.tag.clone());

        let published = resolved
            .bump_version()?
            .run_hooks(&self.hooks, HookSlot::PostVersionBump)
            .await?
            .build(self.cli.as_ref(), &self.hooks, self.confirmer.as_ref())
            .await?
            .push(self.cli.as_ref(), self.confirmer.as_ref())
            .await?;

        let local_image = published.local_image().to_string();
        let remote_image = published.remote_image().map(str::to_string);
        let context = published.finish();

        info!("Published {} {}", context.repository, context.new_version);
        Ok(PublishOutcome {
            repository: context.repository.to_string(),
            previous_version,
            version: context.new_version,
            local_image,
            remote_image,
            dry_run: context.options.dry_run,
        })
    }
}
