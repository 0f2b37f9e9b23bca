// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates ecr-release.yml template files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::RepositoryName;

use super::{CONFIG_FILENAME, Config};

/// Write a commented config template into `dir`, returning its path.
pub fn init_config(dir: &Path, repository: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(r) = repository {
        config.repository =
            Some(RepositoryName::new(r).map_err(|e| Error::InvalidConfig(e.to_string()))?);
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(config_path)
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"repository: {}
# region: eu-west-1
bump: {}
# Prepended to every published version, e.g. "v"
version_prefix: "{}"
context: {}
# Extra arguments for the image build
# build_args:
#   - -f
#   - Dockerfile
engine: {}
"#,
        config
            .repository
            .as_ref()
            .map(RepositoryName::as_str)
            .unwrap_or("my-app"),
        config.bump,
        config.version_prefix,
        config.context.display(),
        config.engine,
    )
}
