// ABOUTME: Publish state marker types for the type state pattern.
// ABOUTME: States carry the data produced by the step that entered them.

use crate::version::LatestVersion;

/// Initial state: context created, nothing checked yet.
/// Available actions: `ensure_repository()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Repository checked (and created unless dry run).
/// Available actions: `resolve_version()`
#[derive(Debug, Clone, Copy)]
pub struct RepositoryReady {
    pub(crate) exists: bool,
}

/// Latest released version known.
/// Available actions: `bump_version()`
#[derive(Debug, Clone)]
pub struct VersionResolved {
    pub(crate) latest: Option<LatestVersion>,
}

/// New version computed and stored in the context.
/// Available actions: `run_hooks()`, `build()`
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionBumped;

/// Image built locally (or build skipped in dry run).
/// Available actions: `push()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) local_image: String,
}

/// Image pushed (or push skipped in dry run).
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Published {
    pub(crate) local_image: String,
    pub(crate) remote_image: Option<String>,
}
