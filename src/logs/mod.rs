// ABOUTME: Resolution of deployment logs against an eventually-consistent control plane.
// ABOUTME: Version choice, bounded waits, status routing, process selection, streaming.

mod error;
mod poll;
mod route;
mod select;
mod service;
mod stream;
mod version;
mod wait;

pub use error::{ErrorKind, LogsError};
pub use poll::{PollOutcome, poll_until};
pub use route::{Outcome, Route, after_progress, route};
pub use select::{best_for_logging, by_logging};
pub use service::DeploymentLogs;
pub use stream::{CONTENT_TYPE, CopyError, LogStream, open_log_stream};
pub use version::{VersionError, resolve_version};
pub use wait::{
    WaitError, wait_for_deployer_running, wait_for_deployment, wait_for_deployment_progress,
};
