// ABOUTME: Decides, from a deployment's status, where its logs come from.
// ABOUTME: Pure transition functions; the waiting itself happens elsewhere.

use crate::model::DeploymentStatus;
use crate::types::ProcessName;

/// Next step for a log request given the deployment status at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Nothing to show yet and the caller does not want to wait.
    Empty,
    /// Read the deployer process.
    Deployer,
    /// Read the best application process.
    Application,
    /// Wait for the deployer to start and the deployment to progress, then
    /// decide again with [`after_progress`].
    AwaitProgress,
}

/// Where the logs of a request end up coming from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    EmptyStream,
    StreamFromDeployer(ProcessName),
    StreamFromApplication(ProcessName),
}

impl Outcome {
    /// The process to read, if any.
    pub fn process(&self) -> Option<&ProcessName> {
        match self {
            Outcome::EmptyStream => None,
            Outcome::StreamFromDeployer(name) | Outcome::StreamFromApplication(name) => Some(name),
        }
    }
}

/// Decision for the status found at entry.
///
/// A record with no recognisable status reads from the deployer, which is
/// the only process every deployment has.
pub fn route(status: Option<DeploymentStatus>, no_wait: bool) -> Route {
    match status {
        Some(DeploymentStatus::New | DeploymentStatus::Pending) if no_wait => Route::Empty,
        Some(DeploymentStatus::New | DeploymentStatus::Pending) => Route::AwaitProgress,
        Some(DeploymentStatus::Complete) => Route::Application,
        Some(DeploymentStatus::Running | DeploymentStatus::Failed) | None => Route::Deployer,
    }
}

/// Decision once the deployment has progressed past `Pending`.
pub fn after_progress(status: Option<DeploymentStatus>) -> Route {
    if status == Some(DeploymentStatus::Complete) {
        Route::Application
    } else {
        Route::Deployer
    }
}
