// ABOUTME: Publish error types with SNAFU context selectors.
// ABOUTME: Every variant is fatal; the pipeline never retries or rolls back.

use snafu::Snafu;

use super::confirm::ConfirmError;
use crate::hooks::HookFailure;
use crate::process::ProcessError;
use crate::registry::RegistryError;
use crate::version::VersionError;

/// Errors that abort a publish run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PublishError {
    #[snafu(display("failed to ensure repository {repository} exists: {source}"))]
    Repository {
        repository: String,
        source: RegistryError,
    },

    #[snafu(display("failed to list images in {repository}: {source}"))]
    Inventory {
        repository: String,
        source: RegistryError,
    },

    #[snafu(context(false), display("{source}"))]
    InvalidVersion { source: VersionError },

    #[snafu(context(false), display("{source}"))]
    Hook { source: HookFailure },

    #[snafu(display("image build failed: {source}"))]
    Build { source: ProcessError },

    #[snafu(display("failed to get registry credentials: {source}"))]
    Credentials { source: RegistryError },

    #[snafu(display("image push failed: {source}"))]
    Push { source: ProcessError },

    #[snafu(display("could not confirm {step}: {source}"))]
    Confirm { step: String, source: ConfirmError },

    #[snafu(display("{step} declined, publish cancelled"))]
    Cancelled { step: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// A registry query or mutation failed.
    RepositoryUnavailable,
    /// The current version could not be bumped.
    InvalidVersion,
    /// A registered hook failed.
    HookFailed,
    /// The build or push process exited non-zero or could not start.
    BuildOrPushFailed,
    /// The confirmation prompt could not be shown.
    PromptFailed,
    /// The build or push was declined at the confirmation prompt.
    Cancelled,
}

impl PublishError {
    pub fn kind(&self) -> PublishErrorKind {
        match self {
            PublishError::Repository { .. }
            | PublishError::Inventory { .. }
            | PublishError::Credentials { .. } => PublishErrorKind::RepositoryUnavailable,
            PublishError::InvalidVersion { .. } => PublishErrorKind::InvalidVersion,
            PublishError::Hook { .. } => PublishErrorKind::HookFailed,
            PublishError::Build { .. } | PublishError::Push { .. } => {
                PublishErrorKind::BuildOrPushFailed
            }
            PublishError::Confirm { .. } => PublishErrorKind::PromptFailed,
            PublishError::Cancelled { .. } => PublishErrorKind::Cancelled,
        }
    }
}
