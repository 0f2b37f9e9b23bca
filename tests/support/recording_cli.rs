// ABOUTME: ContainerCli double that records invocations instead of running processes.
// ABOUTME: Can be told to fail a given operation with a non-zero exit code.

use async_trait::async_trait;
use ecr_release::process::{BuildRequest, ContainerCli, ProcessError};
use ecr_release::registry::AuthorizationToken;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct RecordingCli {
    calls: Mutex<Vec<String>>,
    builds: Mutex<Vec<BuildRequest>>,
    fail_on: Option<&'static str>,
}

impl RecordingCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call of `operation` (`build`, `login`, `tag`, or `push`).
    pub fn failing(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn builds(&self) -> Vec<BuildRequest> {
        self.builds.lock().unwrap().clone()
    }

    fn run(&self, operation: &'static str, call: String) -> Result<(), ProcessError> {
        self.calls.lock().unwrap().push(call.clone());
        if self.fail_on == Some(operation) {
            return Err(ProcessError::Failed {
                command: format!("docker {call}"),
                exit_code: Some(1),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerCli for RecordingCli {
    async fn build(&self, request: &BuildRequest) -> Result<(), ProcessError> {
        self.builds.lock().unwrap().push(request.clone());
        self.run("build", format!("build {}", request.image))
    }

    async fn login(&self, token: &AuthorizationToken) -> Result<(), ProcessError> {
        self.run("login", format!("login {}", token.endpoint))
    }

    async fn tag(&self, source: &str, target: &str) -> Result<(), ProcessError> {
        self.run("tag", format!("tag {source} {target}"))
    }

    async fn push(&self, reference: &str) -> Result<(), ProcessError> {
        self.run("push", format!("push {reference}"))
    }
}
