// ABOUTME: Process collaborator for building, tagging, and pushing images with a container CLI.
// ABOUTME: Defines the ContainerCli trait, build requests, and process errors.

mod docker;

pub use docker::DockerCli;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::registry::AuthorizationToken;

/// Container engine whose CLI performs builds and pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Docker,
    Podman,
}

impl Engine {
    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            Engine::Docker => "docker",
            Engine::Podman => "podman",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Inputs for one image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Local reference, `<repository>:<version>`.
    pub image: String,
    pub version: String,
    pub context: PathBuf,
    /// Passed through verbatim, e.g. `-f Dockerfile --build-arg X=1`.
    pub extra_args: Vec<String>,
}

impl BuildRequest {
    /// CLI arguments for the build, context directory last.
    pub fn to_args(&self, built_at: DateTime<Utc>) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "-t".to_string(),
            self.image.clone(),
            "--label".to_string(),
            format!("version={}", self.version),
            "--label".to_string(),
            format!(
                "built-at={}",
                built_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(self.context.display().to_string());
        args
    }
}

/// Image build and push operations. Every call waits for the process to exit.
#[async_trait]
pub trait ContainerCli: Send + Sync {
    async fn build(&self, request: &BuildRequest) -> Result<(), ProcessError>;

    async fn login(&self, token: &AuthorizationToken) -> Result<(), ProcessError>;

    async fn tag(&self, source: &str, target: &str) -> Result<(), ProcessError>;

    async fn push(&self, reference: &str) -> Result<(), ProcessError>;
}

/// Errors from running container CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{program} is not installed or not in PATH")]
    NotInstalled { program: String },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with exit code {}", describe_exit(.exit_code))]
    Failed {
        command: String,
        exit_code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown (terminated by signal)".to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn build_args_put_context_last() {
        let request = BuildRequest {
            image: "orders:1.3.0".to_string(),
            version: "1.3.0".to_string(),
            context: PathBuf::from("services/orders"),
            extra_args: vec!["-f".to_string(), "Dockerfile.prod".to_string()],
        };
        let built_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(
            request.to_args(built_at),
            [
                "build",
                "-t",
                "orders:1.3.0",
                "--label",
                "version=1.3.0",
                "--label",
                "built-at=2025-03-01T12:00:00.000Z",
                "-f",
                "Dockerfile.prod",
                "services/orders",
            ]
        );
    }

    #[test]
    fn failed_error_mentions_exit_code() {
        let err = ProcessError::Failed {
            command: "docker push x".to_string(),
            exit_code: Some(125),
        };
        assert_eq!(err.to_string(), "`docker push x` failed with exit code 125");
    }

    #[test]
    fn engine_programs() {
        assert_eq!(Engine::Docker.program(), "docker");
        assert_eq!(Engine::Podman.to_string(), "podman");
    }
}
