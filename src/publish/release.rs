// ABOUTME: Generic publish run parameterized by state marker.
// ABOUTME: Owns the single authoritative PublishContext between steps.

use crate::types::RepositoryName;
use crate::version::LatestVersion;

use super::PublishContext;
use super::state::{Built, Initialized, Published, RepositoryReady, VersionResolved};

/// A publish in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Release<S> {
    pub(crate) context: PublishContext,
    pub(crate) state: S,
}

impl Release<Initialized> {
    pub fn new(context: PublishContext) -> Self {
        Release {
            context,
            state: Initialized,
        }
    }
}

impl<S> Release<S> {
    pub fn context(&self) -> &PublishContext {
        &self.context
    }

    pub fn repository(&self) -> &RepositoryName {
        &self.context.repository
    }

    pub fn is_dry_run(&self) -> bool {
        self.context.options.dry_run
    }

    pub(crate) fn transition<T>(self, state: T) -> Release<T> {
        Release {
            context: self.context,
            state,
        }
    }
}

impl Release<RepositoryReady> {
    /// Whether the repository existed (or was created).
    pub fn repository_exists(&self) -> bool {
        self.state.exists
    }
}

impl Release<VersionResolved> {
    /// Latest release found, `None` for a first release.
    pub fn latest(&self) -> Option<&LatestVersion> {
        self.state.latest.as_ref()
    }
}

impl Release<Built> {
    pub fn local_image(&self) -> &str {
        &self.state.local_image
    }
}

impl Release<Published> {
    pub fn local_image(&self) -> &str {
        &self.state.local_image
    }

    /// Registry reference pushed, `None` in dry run.
    pub fn remote_image(&self) -> Option<&str> {
        self.state.remote_image.as_deref()
    }

    /// End the run, handing back the final context.
    pub fn finish(self) -> PublishContext {
        self.context
    }
}
