// ABOUTME: Error type for deployment log requests, with SNAFU context.
// ABOUTME: Each failure is classified once into an ErrorKind for the caller.

use snafu::Snafu;
use std::time::Duration;

use super::version::VersionError;
use super::wait::WaitError;
use crate::model::InvalidOptions;
use crate::store::StoreError;
use crate::types::{ConfigName, DeploymentName, Namespace, NamespaceError, ProcessName};

/// Everything that can stop a deployment log request.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LogsError {
    #[snafu(display("namespace parameter required"))]
    MissingNamespace,

    #[snafu(display("invalid namespace: {source}"))]
    InvalidNamespace { source: NamespaceError },

    #[snafu(display("invalid log options: {source}"))]
    BadOptions { source: InvalidOptions },

    #[snafu(display("deploymentConfig {name:?} not found in namespace {namespace}"))]
    ConfigNotFound { namespace: Namespace, name: ConfigName },

    #[snafu(display("failed to read deploymentConfig {name:?}: {source}"))]
    ConfigRead { name: ConfigName, source: StoreError },

    #[snafu(display("{source}"))]
    Version { source: VersionError },

    #[snafu(display("deployment {name} not found after waiting {timeout:?}"))]
    DeploymentNotFound { name: DeploymentName, timeout: Duration },

    #[snafu(display("failed to read deployment {name}: {source}"))]
    DeploymentRead { name: DeploymentName, source: StoreError },

    #[snafu(display("failed to run deployer process {process}: {source}"))]
    DeployerStartFailed { process: ProcessName, source: WaitError },

    #[snafu(display("unable to wait for deployment {deployment} to run: {source}"))]
    ProgressWait { deployment: DeploymentName, source: WaitError },

    #[snafu(display("timed out after {timeout:?} waiting for deployment {deployment} to run"))]
    ProgressTimeout { deployment: DeploymentName, timeout: Duration },

    #[snafu(display("no processes of deployment {deployment} match selector {selector:?}"))]
    NoCandidateProcess { deployment: DeploymentName, selector: String },

    #[snafu(display("failed to list processes of deployment {deployment}: {source}"))]
    ListProcesses { deployment: DeploymentName, source: StoreError },

    #[snafu(display("{source}"))]
    OpenStream { process: ProcessName, source: StoreError },

    #[snafu(display("request cancelled"))]
    Cancelled,
}

/// Error kind for programmatic handling, e.g. mapping to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request cannot be satisfied as asked.
    BadRequest,
    /// The config, or the deployment after waiting, does not exist.
    NotFound,
    /// The deployment exists but did not start in time.
    ServerTimeout,
    /// The control plane is in an unexpected state or failed.
    Internal,
    /// Opening the log stream failed; the source error is the answer.
    Passthrough,
    /// The caller gave up.
    Cancelled,
}

impl LogsError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogsError::MissingNamespace
            | LogsError::InvalidNamespace { .. }
            | LogsError::BadOptions { .. }
            | LogsError::Version { .. }
            | LogsError::DeployerStartFailed { .. }
            | LogsError::ProgressWait { .. } => ErrorKind::BadRequest,
            LogsError::ConfigNotFound { .. } | LogsError::DeploymentNotFound { .. } => {
                ErrorKind::NotFound
            }
            LogsError::ProgressTimeout { .. } => ErrorKind::ServerTimeout,
            LogsError::ConfigRead { .. }
            | LogsError::DeploymentRead { .. }
            | LogsError::NoCandidateProcess { .. }
            | LogsError::ListProcesses { .. } => ErrorKind::Internal,
            LogsError::OpenStream { .. } => ErrorKind::Passthrough,
            LogsError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// The untouched store error behind a passthrough failure.
    pub fn passthrough(&self) -> Option<&StoreError> {
        match self {
            LogsError::OpenStream { source, .. } => Some(source),
            _ => None,
        }
    }
}
