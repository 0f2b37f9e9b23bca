// ABOUTME: Confirmation gate asked before the build and before the push.
// ABOUTME: The terminal implementation prompts via dialoguer; AutoConfirm answers yes for CI.

use async_trait::async_trait;

/// Asks whether a mutating step may go ahead.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// `Ok(false)` cancels the publish run.
    async fn confirm(&self, prompt: &str) -> Result<bool, ConfirmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("confirmation prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("confirmation prompt was interrupted")]
    Interrupted,
}

/// Answers yes without asking. Used for `--yes` and by library callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> Result<bool, ConfirmError> {
        Ok(true)
    }
}

/// Prompts on the terminal, defaulting to yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &str) -> Result<bool, ConfirmError> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(true)
                .interact()
        })
        .await
        .map_err(|_| ConfirmError::Interrupted)?
        .map_err(ConfirmError::from)
    }
}
