// ABOUTME: Options accepted when requesting deployment logs.
// ABOUTME: Splits version selection from the options forwarded to the process store.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Options for a deployment log request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentLogOptions {
    /// Explicit deployment version. Wins over `previous`.
    pub version: Option<i64>,
    /// Read the deployment before the latest one.
    pub previous: bool,
    /// Return immediately with no output if the deployment has not started.
    pub no_wait: bool,
    /// Keep streaming as the process writes (like `tail -f`).
    pub follow: bool,
    /// Container to read from when the process has several.
    pub container: Option<String>,
    /// Number of lines to show from the end.
    pub tail_lines: Option<u64>,
    /// Only show output newer than this many seconds.
    pub since_seconds: Option<u64>,
    /// Only show output newer than this instant.
    pub since_time: Option<DateTime<Utc>>,
    /// Prefix each line with its timestamp.
    pub timestamps: bool,
    /// Stop after this many bytes.
    pub limit_bytes: Option<u64>,
    /// Read the previous instance of a restarted container.
    pub previous_container: bool,
}

/// The subset of [`DeploymentLogOptions`] understood by the process store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessLogOptions {
    pub container: Option<String>,
    pub follow: bool,
    pub tail_lines: Option<u64>,
    pub since_seconds: Option<u64>,
    pub since_time: Option<DateTime<Utc>>,
    pub timestamps: bool,
    pub limit_bytes: Option<u64>,
    pub previous: bool,
}

/// Reasons a set of log options is rejected before any lookup happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidOptions {
    #[error("deployment version must be greater than 0, got {0}")]
    NonPositiveVersion(i64),

    #[error("at most one of sinceSeconds or sinceTime may be specified")]
    ConflictingSince,

    #[error("sinceSeconds must be greater than 0")]
    ZeroSinceSeconds,

    #[error("limitBytes must be greater than 0")]
    ZeroLimitBytes,
}

impl DeploymentLogOptions {
    /// Options that stream the latest deployment as it runs.
    pub fn follow_latest() -> Self {
        Self {
            follow: true,
            ..Default::default()
        }
    }

    /// Options for a specific deployment version.
    pub fn for_version(version: i64) -> Self {
        Self {
            version: Some(version),
            ..Default::default()
        }
    }

    /// Check the options for internal consistency.
    pub fn validate(&self) -> Result<(), InvalidOptions> {
        if let Some(version) = self.version
            && version <= 0
        {
            return Err(InvalidOptions::NonPositiveVersion(version));
        }
        if self.since_seconds.is_some() && self.since_time.is_some() {
            return Err(InvalidOptions::ConflictingSince);
        }
        if self.since_seconds == Some(0) {
            return Err(InvalidOptions::ZeroSinceSeconds);
        }
        if self.limit_bytes == Some(0) {
            return Err(InvalidOptions::ZeroLimitBytes);
        }
        Ok(())
    }

    /// Options to forward to the process store, unchanged.
    pub fn process_options(&self) -> ProcessLogOptions {
        ProcessLogOptions {
            container: self.container.clone(),
            follow: self.follow,
            tail_lines: self.tail_lines,
            since_seconds: self.since_seconds,
            since_time: self.since_time,
            timestamps: self.timestamps,
            limit_bytes: self.limit_bytes,
            previous: self.previous_container,
        }
    }
}
