// ABOUTME: Hooks implemented as executable scripts in the project directory.
// ABOUTME: Context is passed via ECR_RELEASE_* environment variables; non-zero exit fails the hook.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{Hook, HookError, HookSlot};
use crate::publish::PublishContext;
use crate::version::BASELINE_VERSION;

/// Directory, relative to the project, that holds hook scripts.
pub const HOOKS_DIR: &str = ".ecr-release/hooks";

/// An executable run at one hook slot.
#[derive(Debug, Clone)]
pub struct ScriptHook {
    slot: HookSlot,
    path: PathBuf,
    name: String,
}

impl ScriptHook {
    pub fn new(slot: HookSlot, path: PathBuf) -> Self {
        let name = path.display().to_string();
        Self { slot, path, name }
    }

    /// The script for `slot` if one exists in the project.
    pub fn discover(project_dir: &Path, slot: HookSlot) -> Option<Self> {
        let path = project_dir.join(HOOKS_DIR).join(slot.filename());
        path.is_file().then(|| Self::new(slot, path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Environment handed to the script.
    pub fn env(&self, context: &PublishContext) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("ECR_RELEASE_HOOK".to_string(), self.slot.to_string());
        env.insert(
            "ECR_RELEASE_REPOSITORY".to_string(),
            context.repository.to_string(),
        );
        env.insert(
            "ECR_RELEASE_CURRENT_VERSION".to_string(),
            context
                .current_version
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| BASELINE_VERSION.to_string()),
        );
        if let Some(ref tag) = context.current_tag {
            env.insert("ECR_RELEASE_CURRENT_TAG".to_string(), tag.clone());
        }
        if !context.new_version.is_empty() {
            env.insert(
                "ECR_RELEASE_NEW_VERSION".to_string(),
                context.new_version.clone(),
            );
        }
        env.insert(
            "ECR_RELEASE_BUMP".to_string(),
            context.options.bump.to_string(),
        );
        env.insert(
            "ECR_RELEASE_DRY_RUN".to_string(),
            context.options.dry_run.to_string(),
        );
        env.insert(
            "ECR_RELEASE_BUILD_CONTEXT".to_string(),
            context.options.context.display().to_string(),
        );
        env
    }
}

#[async_trait]
impl Hook for ScriptHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, context: PublishContext) -> Result<PublishContext, HookError> {
        let output = Command::new(&self.path)
            .envs(self.env(&context))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| HookError::ScriptSpawn {
                path: self.path.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            tracing::info!(hook = %self.slot, "{}", line);
        }

        if output.status.success() {
            tracing::info!("{} hook completed successfully", self.slot);
            Ok(context)
        } else {
            tracing::warn!(
                "{} hook failed with exit code {:?}",
                self.slot,
                output.status.code()
            );
            Err(HookError::ScriptFailed {
                path: self.path.clone(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
