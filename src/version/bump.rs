// ABOUTME: Computes the next release version from the current one and a bump kind.
// ABOUTME: Prefix-agnostic; callers prepend any configured version prefix.

use semver::Version;
use serde::Deserialize;
use std::fmt;

/// Which semver component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Major,
    #[default]
    Minor,
    Patch,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The current version is not semver. Fatal for a publish run.
    #[error("invalid version string: {0}")]
    InvalidVersion(String),
}

/// Increment `current` by `kind`.
///
/// Accepts an optional leading `v`. A pre-release input is released rather
/// than incremented when it already sits on the target boundary
/// (`1.3.0-rc.1` minor -> `1.3.0`). Build metadata is dropped.
pub fn bump(current: &str, kind: BumpKind) -> Result<String, VersionError> {
    let stripped = current.strip_prefix('v').unwrap_or(current);
    let version =
        Version::parse(stripped).map_err(|_| VersionError::InvalidVersion(current.to_string()))?;
    let prerelease = !version.pre.is_empty();

    let next = match kind {
        BumpKind::Major if prerelease && version.minor == 0 && version.patch == 0 => {
            Version::new(version.major, 0, 0)
        }
        BumpKind::Major => Version::new(version.major + 1, 0, 0),
        BumpKind::Minor if prerelease && version.patch == 0 => {
            Version::new(version.major, version.minor, 0)
        }
        BumpKind::Minor => Version::new(version.major, version.minor + 1, 0),
        BumpKind::Patch if prerelease => {
            Version::new(version.major, version.minor, version.patch)
        }
        BumpKind::Patch => Version::new(version.major, version.minor, version.patch + 1),
    };

    tracing::info!(from = current, to = %next, bump = %kind, "Bumping version");
    Ok(next.to_string())
}
