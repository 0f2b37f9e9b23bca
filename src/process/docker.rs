// ABOUTME: ContainerCli implementation that shells out to docker or podman.
// ABOUTME: Streams build/push output to the terminal and feeds login passwords over stdin.

use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{BuildRequest, ContainerCli, Engine, ProcessError};
use crate::registry::AuthorizationToken;

/// Runs container CLI commands as child processes.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(engine: Engine) -> Self {
        Self::with_program(engine.program())
    }

    /// Use an explicit executable, e.g. a wrapper script or absolute path.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<(), ProcessError> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        tracing::info!("Running: {}", command_line);

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = command.spawn().map_err(|e| self.spawn_error(&command_line, e))?;

        // A failed write is reported only if the process itself succeeded.
        let mut write_error = None;
        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            write_error = pipe.write_all(input.as_bytes()).await.err();
            // Dropping the pipe sends EOF
        }

        let status = child
            .wait()
            .await
            .map_err(|e| self.spawn_error(&command_line, e))?;

        if status.success() {
            match write_error {
                Some(e) => Err(self.spawn_error(&command_line, e)),
                None => Ok(()),
            }
        } else {
            tracing::warn!("{} exited with {:?}", command_line, status.code());
            Err(ProcessError::Failed {
                command: command_line,
                exit_code: status.code(),
            })
        }
    }

    fn spawn_error(&self, command_line: &str, source: std::io::Error) -> ProcessError {
        if source.kind() == ErrorKind::NotFound {
            ProcessError::NotInstalled {
                program: self.program.clone(),
            }
        } else {
            ProcessError::Spawn {
                command: command_line.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl ContainerCli for DockerCli {
    async fn build(&self, request: &BuildRequest) -> Result<(), ProcessError> {
        tracing::info!(context = %request.context.display(), image = %request.image, "Building image");
        self.run(&request.to_args(Utc::now()), None).await
    }

    async fn login(&self, token: &AuthorizationToken) -> Result<(), ProcessError> {
        let args = [
            "login".to_string(),
            "--username".to_string(),
            token.username.clone(),
            "--password-stdin".to_string(),
            token.endpoint.clone(),
        ];
        self.run(&args, Some(&token.password)).await
    }

    async fn tag(&self, source: &str, target: &str) -> Result<(), ProcessError> {
        let args = ["tag".to_string(), source.to_string(), target.to_string()];
        self.run(&args, None).await
    }

    async fn push(&self, reference: &str) -> Result<(), ProcessError> {
        let args = ["push".to_string(), reference.to_string()];
        self.run(&args, None).await
    }
}
