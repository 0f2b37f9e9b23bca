// ABOUTME: Hook pipeline for publish lifecycle extension points.
// ABOUTME: Ordered hooks per slot thread the publish context through, one at a time.

mod script;

pub use script::{HOOKS_DIR, ScriptHook};

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::publish::PublishContext;

/// Hook execution points in the publish lifecycle, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookSlot {
    /// After the new version is computed, before anything is built.
    PostVersionBump,
    /// Immediately before the image build.
    PreBuild,
    /// Immediately after the image build, before the push.
    PostBuild,
}

impl HookSlot {
    pub const ALL: [HookSlot; 3] = [
        HookSlot::PostVersionBump,
        HookSlot::PreBuild,
        HookSlot::PostBuild,
    ];

    /// Name used for hook script files and log output.
    pub fn filename(&self) -> &'static str {
        match self {
            HookSlot::PostVersionBump => "post-version-bump",
            HookSlot::PreBuild => "pre-build",
            HookSlot::PostBuild => "post-build",
        }
    }
}

impl fmt::Display for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filename())
    }
}

/// A publish extension point.
///
/// A hook receives the context by value and returns the context the pipeline
/// continues with, modified or not.
#[async_trait]
pub trait Hook: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, context: PublishContext) -> Result<PublishContext, HookError>;
}

/// Errors raised by a hook body.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{0}")]
    Failed(String),

    #[error("hook script {} exited with code {exit_code:?}: {stderr}", path.display())]
    ScriptFailed {
        path: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to execute hook script {}: {source}", path.display())]
    ScriptSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HookError {
    pub fn msg(message: impl Into<String>) -> Self {
        HookError::Failed(message.into())
    }
}

/// A hook failure, tagged with where it happened.
#[derive(Debug, thiserror::Error)]
#[error("{slot} hook '{hook}' failed: {source}")]
pub struct HookFailure {
    pub slot: HookSlot,
    pub hook: String,
    #[source]
    pub source: HookError,
}

/// Hook backed by a closure returning a future.
pub struct FnHook<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a [`Hook`].
///
/// Synchronous hooks can return `std::future::ready(..)`.
pub fn hook_fn<F, Fut>(name: impl Into<String>, f: F) -> FnHook<F>
where
    F: Fn(PublishContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PublishContext, HookError>> + Send + 'static,
{
    FnHook {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<F, Fut> Hook for FnHook<F>
where
    F: Fn(PublishContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PublishContext, HookError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, context: PublishContext) -> Result<PublishContext, HookError> {
        (self.f)(context).await
    }
}

/// Registered hooks, FIFO per slot. No dedup and no priorities.
#[derive(Default)]
pub struct HookPipeline {
    hooks: HashMap<HookSlot, Vec<Box<dyn Hook>>>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to a slot.
    pub fn register(&mut self, slot: HookSlot, hook: impl Hook + 'static) -> &mut Self {
        self.hooks.entry(slot).or_default().push(Box::new(hook));
        self
    }

    /// Register every hook script found under `<project_dir>/.ecr-release/hooks`.
    pub fn discover_scripts(&mut self, project_dir: &Path) -> &mut Self {
        for slot in HookSlot::ALL {
            if let Some(script) = ScriptHook::discover(project_dir, slot) {
                tracing::debug!("Discovered {} hook: {}", slot, script.path().display());
                self.register(slot, script);
            }
        }
        self
    }

    pub fn hooks(&self, slot: HookSlot) -> &[Box<dyn Hook>] {
        self.hooks.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(Vec::is_empty)
    }

    /// Run a slot's hooks in registration order.
    ///
    /// Each hook is awaited to completion before the next starts and receives
    /// the context the previous hook returned. The first failure stops the slot.
    pub async fn run(
        &self,
        slot: HookSlot,
        mut context: PublishContext,
    ) -> Result<PublishContext, HookFailure> {
        for hook in self.hooks(slot) {
            tracing::info!(slot = %slot, hook = hook.name(), "Running hook");
            context = hook.run(context).await.map_err(|source| HookFailure {
                slot,
                hook: hook.name().to_string(),
                source,
            })?;
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_filenames() {
        assert_eq!(HookSlot::PostVersionBump.filename(), "post-version-bump");
        assert_eq!(HookSlot::PreBuild.filename(), "pre-build");
        assert_eq!(HookSlot::PostBuild.filename(), "post-build");
    }

    #[test]
    fn slots_listed_in_execution_order() {
        assert_eq!(
            HookSlot::ALL,
            [
                HookSlot::PostVersionBump,
                HookSlot::PreBuild,
                HookSlot::PostBuild
            ]
        );
    }

    #[test]
    fn registration_appends() {
        let mut pipeline = HookPipeline::new();
        assert!(pipeline.is_empty());

        pipeline
            .register(
                HookSlot::PreBuild,
                hook_fn("first", |ctx| std::future::ready(Ok(ctx))),
            )
            .register(
                HookSlot::PreBuild,
                hook_fn("second", |ctx| std::future::ready(Ok(ctx))),
            );

        let names: Vec<_> = pipeline
            .hooks(HookSlot::PreBuild)
            .iter()
            .map(|h| h.name())
            .collect();
        assert_eq!(names, ["first", "second"]);
        assert!(pipeline.hooks(HookSlot::PostBuild).is_empty());
    }

    #[test]
    fn discover_in_missing_dir_registers_nothing() {
        let mut pipeline = HookPipeline::new();
        pipeline.discover_scripts(Path::new("/nonexistent"));
        assert!(pipeline.is_empty());
    }
}
