// ABOUTME: Publish command implementation.
// ABOUTME: Merges config with flags, wires ECR and the container CLI, and runs the pipeline.

use ecr_release::config::Config;
use ecr_release::error::Result;
use ecr_release::output::Output;
use ecr_release::process::DockerCli;
use ecr_release::publish::{AutoConfirm, Confirmer, PublishErrorKind, Publisher, TerminalConfirmer};
use ecr_release::registry::EcrRegistry;
use std::path::Path;
use std::sync::Arc;

pub async fn publish(
    config: Config,
    dry_run: bool,
    assume_yes: bool,
    project_dir: &Path,
    mut output: Output,
) -> Result<()> {
    let repository = config.require_repository()?.clone();
    output.start_timer();

    output.progress(&format!(
        "Publishing {} ({} bump){}",
        repository,
        config.bump,
        if dry_run { " [dry run]" } else { "" }
    ));

    let registry = Arc::new(EcrRegistry::connect(config.region.as_deref()).await);
    let cli = Arc::new(DockerCli::new(config.engine));

    let confirmer: Arc<dyn Confirmer> = if assume_yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(TerminalConfirmer)
    };

    let publisher = Publisher::new(registry, cli)
        .with_confirmer(confirmer)
        .with_script_hooks(project_dir);
    let outcome = match publisher
        .publish(repository, config.publish_options(dry_run))
        .await
    {
        Ok(outcome) => outcome,
        // Declining a prompt is a normal way to stop.
        Err(err) if err.kind() == PublishErrorKind::Cancelled => {
            output.success(&err.to_string());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let message = match (&outcome.remote_image, outcome.dry_run) {
        (Some(remote), _) => format!("Published {remote}"),
        (None, true) => format!("Dry run complete: would publish {}", outcome.local_image),
        (None, false) => format!("Published {}", outcome.local_image),
    };
    output.result(&message, &outcome);
    Ok(())
}
