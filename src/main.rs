// ABOUTME: Entry point for the ecr-release CLI application.
// ABOUTME: Parses arguments, installs logging, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, PublishArgs};
use ecr_release::config::{self, Config, Overrides};
use ecr_release::error::Result;
use ecr_release::output::{Output, OutputMode};
use ecr_release::types::RepositoryName;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose selects debug.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let mode = OutputMode::from_flags(cli.quiet, cli.json);
    let result = run(cli, Output::new(mode)).await;

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { repository, force } => {
            let path = config::init_config(&cwd, repository.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Publish(args) => {
            let (dry_run, assume_yes) = (args.dry_run, args.yes);
            let config = Config::discover_or_default(&cwd)?.with_overrides(overrides(args))?;
            commands::publish(config, dry_run, assume_yes, &cwd, output).await
        }
        Commands::Tag {
            repo,
            source,
            stage,
            region,
        } => {
            let config = Config::discover_or_default(&cwd)?.with_overrides(Overrides {
                repository: repo,
                region,
                ..Overrides::default()
            })?;
            let repository: RepositoryName = config.require_repository()?.clone();
            commands::tag(
                repository,
                &source,
                &stage,
                config.region.as_deref(),
                output,
            )
            .await
        }
        Commands::CustomResource { event, region } => {
            commands::custom_resource(event.as_deref(), region, output).await
        }
    }
}

fn overrides(args: PublishArgs) -> Overrides {
    Overrides {
        repository: args.repo,
        region: args.region,
        bump: args.bump,
        version_prefix: args.prefix,
        context: args.context,
        build_args: args.build_args,
        engine: args.engine,
    }
}
