// ABOUTME: Waits for deployment records and deployer processes to materialize.
// ABOUTME: Existence, deployer start, and deployment progress, all bounded.

use super::poll::{PollOutcome, poll_until};
use crate::config::WaitSettings;
use crate::model::{DeploymentRecord, DeploymentStatus, Process};
use crate::store::{DeploymentStore, ProcessStore, StoreError};
use crate::types::{DeploymentName, Namespace, deployer_name};
use parking_lot::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a bounded wait did not produce what it was waiting for.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("deployment {0} was deleted while waiting for it")]
    Deleted(DeploymentName),

    #[error("wait cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Wait for the deployment record `name` to exist.
///
/// "Not found" means the control plane has not created it yet; any other read
/// error ends the wait immediately.
pub async fn wait_for_deployment(
    store: &dyn DeploymentStore,
    namespace: &Namespace,
    name: &DeploymentName,
    settings: &WaitSettings,
    cancel: &CancellationToken,
) -> Result<DeploymentRecord, WaitError> {
    let outcome = poll_until(settings.interval, settings.timeout, cancel, move || async move {
        match store.get_deployment(namespace, name).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await?;

    match outcome {
        PollOutcome::Ready(record) => Ok(record),
        PollOutcome::TimedOut => Err(WaitError::TimedOut(settings.timeout)),
        PollOutcome::Cancelled => Err(WaitError::Cancelled),
    }
}

/// Wait until the deployer process of `record` has output to read.
///
/// The deployer counts as started once it is running or has already
/// finished; a deployer that does not exist yet is waited for.
pub async fn wait_for_deployer_running(
    store: &dyn ProcessStore,
    record: &DeploymentRecord,
    settings: &WaitSettings,
    cancel: &CancellationToken,
) -> Result<Process, WaitError> {
    let name = &deployer_name(&record.name);
    let outcome = poll_until(settings.interval, settings.timeout, cancel, move || async move {
        match store.get_process(&record.namespace, name).await {
            Ok(process) if process.phase.has_logs() => Ok(Some(process)),
            Ok(process) => {
                tracing::trace!(process = %name, phase = %process.phase, "deployer not running yet");
                Ok(None)
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await?;

    match outcome {
        PollOutcome::Ready(process) => Ok(process),
        PollOutcome::TimedOut => Err(WaitError::TimedOut(settings.timeout)),
        PollOutcome::Cancelled => Err(WaitError::Cancelled),
    }
}

/// Wait until `record` reaches `Running` or a terminal status.
///
/// Returns the latest observed record and whether it progressed in time.
/// A record that disappears while waiting is an error.
pub async fn wait_for_deployment_progress(
    store: &dyn DeploymentStore,
    record: &DeploymentRecord,
    settings: &WaitSettings,
    cancel: &CancellationToken,
) -> Result<(DeploymentRecord, bool), WaitError> {
    let observed = &Mutex::new(record.clone());
    let outcome = poll_until(settings.interval, settings.timeout, cancel, move || async move {
        match store.get_deployment(&record.namespace, &record.name).await {
            Ok(latest) => {
                let started = latest.status().is_some_and(DeploymentStatus::has_started);
                *observed.lock() = latest.clone();
                Ok(started.then_some(latest))
            }
            Err(e) if e.is_not_found() => Err(WaitError::Deleted(record.name.clone())),
            Err(e) => Err(WaitError::Store(e)),
        }
    })
    .await?;

    match outcome {
        PollOutcome::Ready(latest) => Ok((latest, true)),
        PollOutcome::TimedOut => Ok((observed.lock().clone(), false)),
        PollOutcome::Cancelled => Err(WaitError::Cancelled),
    }
}
