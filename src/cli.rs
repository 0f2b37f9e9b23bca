// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use ecr_release::process::Engine;
use ecr_release::version::BumpKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecr-release")]
#[command(about = "Semver release publishing and stage tagging for Amazon ECR images")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ecr-release.yml configuration file
    Init {
        /// Repository name to put in the template
        #[arg(short, long)]
        repository: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Build and push the next semver release of an image
    Publish(PublishArgs),

    /// Point a stage tag at the image under a source tag
    Tag {
        /// ECR repository name
        #[arg(short, long)]
        repo: Option<String>,

        /// Existing tag whose image receives the stage tag
        #[arg(long)]
        source: String,

        /// Stage tag to apply, e.g. prod
        #[arg(long)]
        stage: String,

        /// AWS region
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,
    },

    /// Handle a CloudFormation custom resource event and send the response
    CustomResource {
        /// Event JSON file; reads stdin when omitted
        event: Option<PathBuf>,

        /// Region used when the event names none
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,
    },
}

#[derive(Args)]
pub struct PublishArgs {
    /// ECR repository name
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Which version component to increment
    #[arg(long, value_enum)]
    pub bump: Option<BumpKind>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Prefix for the published version tag, e.g. v
    #[arg(long)]
    pub prefix: Option<String>,

    /// Container engine for build and push
    #[arg(long, value_enum)]
    pub engine: Option<Engine>,

    /// Resolve and run hooks without creating, building, or pushing
    #[arg(long)]
    pub dry_run: bool,

    /// Build and push without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Build context directory
    pub context: Option<PathBuf>,

    /// Extra image build arguments, after `--`
    #[arg(last = true)]
    pub build_args: Vec<String>,
}
