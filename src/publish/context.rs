// ABOUTME: Mutable state threaded through one publish run and its hooks.
// ABOUTME: Created at publish start and dropped at the end; never persisted.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::registry::Registry;
use crate::types::RepositoryName;
use crate::version::{BumpKind, ParsedVersion};

/// Caller-supplied settings for a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub bump: BumpKind,
    /// Prepended to the bumped version, e.g. `v`.
    pub version_prefix: String,
    /// Extra arguments for the image build.
    pub build_args: Vec<String>,
    /// Build context directory.
    pub context: PathBuf,
    /// Resolve and run hooks, but don't create, build, or push anything.
    pub dry_run: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            bump: BumpKind::default(),
            version_prefix: String::new(),
            build_args: Vec::new(),
            context: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// Publish pipeline state.
///
/// Hooks get full read/write access: whatever a hook returns becomes the
/// context for the rest of the run.
#[derive(Clone)]
pub struct PublishContext {
    pub registry: Arc<dyn Registry>,
    pub repository: RepositoryName,
    /// Latest released version, `None` before resolution or for a first release.
    pub current_version: Option<ParsedVersion>,
    /// Tag string that carried `current_version` in the registry.
    pub current_tag: Option<String>,
    /// Version being published, prefix included. Empty until bumped.
    pub new_version: String,
    pub options: PublishOptions,
}

impl PublishContext {
    pub fn new(
        registry: Arc<dyn Registry>,
        repository: RepositoryName,
        options: PublishOptions,
    ) -> Self {
        Self {
            registry,
            repository,
            current_version: None,
            current_tag: None,
            new_version: String::new(),
            options,
        }
    }

    /// Local image reference for the new version.
    pub fn local_image(&self) -> String {
        format!("{}:{}", self.repository, self.new_version)
    }
}

impl fmt::Debug for PublishContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishContext")
            .field("repository", &self.repository)
            .field("current_version", &self.current_version)
            .field("current_tag", &self.current_tag)
            .field("new_version", &self.new_version)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
