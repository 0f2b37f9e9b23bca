// ABOUTME: Application-wide error types for ecr-release.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::custom_resource::NotifyError;
use crate::publish::PublishError;
use crate::stage::TagError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no repository given; pass --repo or set `repository` in {}", crate::config::CONFIG_FILENAME)]
    MissingRepository,

    #[error("invalid deployment event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
