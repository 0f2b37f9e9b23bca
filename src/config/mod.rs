// ABOUTME: Configuration types and parsing for ecr-release.yml.
// ABOUTME: Handles YAML parsing, file discovery, and CLI flag overrides.

mod init;

pub use init::init_config;

use crate::error::{Error, Result};
use crate::process::Engine;
use crate::publish::PublishOptions;
use crate::types::RepositoryName;
use crate::version::BumpKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "ecr-release.yml";
pub const CONFIG_FILENAME_ALT: &str = "ecr-release.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ecr-release/config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repository: Option<RepositoryName>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub bump: BumpKind,

    #[serde(default)]
    pub version_prefix: String,

    #[serde(default = "default_context")]
    pub context: PathBuf,

    #[serde(default)]
    pub build_args: Vec<String>,

    #[serde(default)]
    pub engine: Engine,
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: None,
            region: None,
            bump: BumpKind::default(),
            version_prefix: String::new(),
            context: default_context(),
            build_args: Vec::new(),
            engine: Engine::default(),
        }
    }
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repository: Option<String>,
    pub region: Option<String>,
    pub bump: Option<BumpKind>,
    pub version_prefix: Option<String>,
    pub context: Option<PathBuf>,
    pub build_args: Vec<String>,
    pub engine: Option<Engine>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading config from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like [`Config::discover`], but a missing file yields defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Apply command-line values on top of the file.
    ///
    /// Build arguments from the command line replace the file's list when
    /// any are given.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Config> {
        if let Some(ref repository) = overrides.repository {
            self.repository = Some(
                RepositoryName::new(repository).map_err(|e| Error::InvalidConfig(e.to_string()))?,
            );
        }

        if overrides.region.is_some() {
            self.region = overrides.region;
        }

        if let Some(bump) = overrides.bump {
            self.bump = bump;
        }

        if let Some(prefix) = overrides.version_prefix {
            self.version_prefix = prefix;
        }

        if let Some(context) = overrides.context {
            self.context = context;
        }

        if !overrides.build_args.is_empty() {
            self.build_args = overrides.build_args;
        }

        if let Some(engine) = overrides.engine {
            self.engine = engine;
        }

        Ok(self)
    }

    pub fn require_repository(&self) -> Result<&RepositoryName> {
        self.repository.as_ref().ok_or(Error::MissingRepository)
    }

    pub fn publish_options(&self, dry_run: bool) -> PublishOptions {
        PublishOptions {
            bump: self.bump,
            version_prefix: self.version_prefix.clone(),
            build_args: self.build_args.clone(),
            context: self.context.clone(),
            dry_run,
        }
    }

    pub fn template() -> Self {
        Config {
            repository: RepositoryName::new("my-app").ok(),
            ..Config::default()
        }
    }
}
