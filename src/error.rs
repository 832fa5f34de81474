// ABOUTME: Application-wide error types for deploylog.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::logs::{CopyError, LogsError};
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Logs(#[from] LogsError),

    #[error("control plane unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("failed to stream logs: {0}")]
    Copy(#[from] CopyError),
}

pub type Result<T> = std::result::Result<T, Error>;
