// ABOUTME: Entry point for deployment log requests.
// ABOUTME: Resolves version, waits for the deployment, routes on status, opens the stream.

use super::error::{
    BadOptionsSnafu, ConfigNotFoundSnafu, ConfigReadSnafu, DeploymentNotFoundSnafu,
    InvalidNamespaceSnafu, ListProcessesSnafu, LogsError, NoCandidateProcessSnafu,
    OpenStreamSnafu, ProgressTimeoutSnafu, VersionSnafu,
};
use super::route::{Outcome, Route, after_progress, route};
use super::select::best_for_logging;
use super::stream::{LogStream, open_log_stream};
use super::version::resolve_version;
use super::wait::{
    WaitError, wait_for_deployer_running, wait_for_deployment, wait_for_deployment_progress,
};
use crate::config::WaitSettings;
use crate::model::{DeploymentLogOptions, DeploymentRecord};
use crate::store::{ConfigStore, DeploymentStore, ProcessStore};
use crate::types::{
    ConfigName, DeploymentName, Namespace, ProcessName, deployer_name, deployment_name,
};
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Resolves which process's output answers a deployment log request.
///
/// Holds only immutable settings and shared store handles, so one instance
/// serves any number of concurrent requests; each request does its own
/// resolution.
#[derive(Clone)]
pub struct DeploymentLogs {
    configs: Arc<dyn ConfigStore>,
    deployments: Arc<dyn DeploymentStore>,
    processes: Arc<dyn ProcessStore>,
    wait: WaitSettings,
}

impl std::fmt::Debug for DeploymentLogs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentLogs")
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl DeploymentLogs {
    pub fn new(
        configs: Arc<dyn ConfigStore>,
        deployments: Arc<dyn DeploymentStore>,
        processes: Arc<dyn ProcessStore>,
        wait: WaitSettings,
    ) -> Self {
        Self {
            configs,
            deployments,
            processes,
            wait,
        }
    }

    /// Build from one value that serves as the whole control plane.
    pub fn for_control_plane<C>(control_plane: C, wait: WaitSettings) -> Self
    where
        C: ConfigStore + DeploymentStore + ProcessStore + Clone + 'static,
    {
        Self::new(
            Arc::new(control_plane.clone()),
            Arc::new(control_plane.clone()),
            Arc::new(control_plane),
            wait,
        )
    }

    /// Stream the logs of a deployment of `config`.
    ///
    /// A deployment that has not started yet, requested with `no_wait`,
    /// yields an empty stream rather than an error.
    pub async fn get(
        &self,
        namespace: &str,
        config: &ConfigName,
        opts: &DeploymentLogOptions,
        cancel: &CancellationToken,
    ) -> Result<LogStream, LogsError> {
        let namespace = parse_namespace(namespace)?;
        let outcome = self.resolve_in(&namespace, config, opts, cancel).await?;

        let Some(process) = outcome.process() else {
            return Ok(LogStream::empty());
        };
        open_log_stream(
            self.processes.as_ref(),
            &namespace,
            process,
            &opts.process_options(),
        )
        .await
        .context(OpenStreamSnafu {
            process: process.clone(),
        })
    }

    /// Decide where the logs of a request come from without opening them.
    pub async fn resolve(
        &self,
        namespace: &str,
        config: &ConfigName,
        opts: &DeploymentLogOptions,
        cancel: &CancellationToken,
    ) -> Result<Outcome, LogsError> {
        let namespace = parse_namespace(namespace)?;
        self.resolve_in(&namespace, config, opts, cancel).await
    }

    async fn resolve_in(
        &self,
        namespace: &Namespace,
        config_name: &ConfigName,
        opts: &DeploymentLogOptions,
        cancel: &CancellationToken,
    ) -> Result<Outcome, LogsError> {
        opts.validate().context(BadOptionsSnafu)?;

        let config = match self.configs.get_config(namespace, config_name).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                return ConfigNotFoundSnafu {
                    namespace: namespace.clone(),
                    name: config_name.clone(),
                }
                .fail();
            }
            Err(e) => {
                return Err(e).context(ConfigReadSnafu {
                    name: config_name.clone(),
                });
            }
        };

        let version = resolve_version(&config, opts.version, opts.previous).context(VersionSnafu)?;
        let target_name = deployment_name(&config.name, version);
        let target = self
            .wait_for_existing(namespace, &target_name, cancel)
            .await?;
        let deployer = deployer_name(&target.name);
        let status = target.status();

        match route(status, opts.no_wait) {
            Route::Empty => {
                tracing::debug!(deployment = %target.name, ?status, "deployment has not started, no logs to retrieve yet");
                Ok(Outcome::EmptyStream)
            }
            Route::Deployer => Ok(Outcome::StreamFromDeployer(deployer)),
            Route::Application => self
                .application_process(&target)
                .await
                .map(Outcome::StreamFromApplication),
            Route::AwaitProgress => {
                tracing::debug!(deployment = %target.name, ?status, "waiting for deployment to start");
                self.await_progress(&target, deployer, cancel).await
            }
        }
    }

    async fn wait_for_existing(
        &self,
        namespace: &Namespace,
        name: &DeploymentName,
        cancel: &CancellationToken,
    ) -> Result<DeploymentRecord, LogsError> {
        match wait_for_deployment(self.deployments.as_ref(), namespace, name, &self.wait, cancel)
            .await
        {
            Ok(record) => Ok(record),
            Err(WaitError::TimedOut(_) | WaitError::Deleted(_)) => DeploymentNotFoundSnafu {
                name: name.clone(),
                timeout: self.wait.timeout,
            }
            .fail(),
            Err(WaitError::Cancelled) => Err(LogsError::Cancelled),
            Err(WaitError::Store(source)) => Err(LogsError::DeploymentRead {
                name: name.clone(),
                source,
            }),
        }
    }

    async fn await_progress(
        &self,
        target: &DeploymentRecord,
        deployer: ProcessName,
        cancel: &CancellationToken,
    ) -> Result<Outcome, LogsError> {
        wait_for_deployer_running(self.processes.as_ref(), target, &self.wait, cancel)
            .await
            .map_err(|e| match e {
                WaitError::Cancelled => LogsError::Cancelled,
                source => LogsError::DeployerStartFailed {
                    process: deployer.clone(),
                    source,
                },
            })?;

        let (latest, progressed) =
            wait_for_deployment_progress(self.deployments.as_ref(), target, &self.wait, cancel)
                .await
                .map_err(|e| match e {
                    WaitError::Cancelled => LogsError::Cancelled,
                    source => LogsError::ProgressWait {
                        deployment: target.name.clone(),
                        source,
                    },
                })?;
        if !progressed {
            return ProgressTimeoutSnafu {
                deployment: target.name.clone(),
                timeout: self.wait.timeout,
            }
            .fail();
        }

        tracing::debug!(deployment = %latest.name, status = ?latest.status(), "deployment started");
        match after_progress(latest.status()) {
            Route::Application => self
                .application_process(&latest)
                .await
                .map(Outcome::StreamFromApplication),
            _ => Ok(Outcome::StreamFromDeployer(deployer)),
        }
    }

    /// The best application process of `record` for log viewing.
    async fn application_process(
        &self,
        record: &DeploymentRecord,
    ) -> Result<ProcessName, LogsError> {
        let mut candidates = self
            .processes
            .list_processes(&record.namespace, &record.selector)
            .await
            .context(ListProcessesSnafu {
                deployment: record.name.clone(),
            })?;
        candidates.retain(|p| record.selector.matches(&p.labels));
        let count = candidates.len();

        let best = best_for_logging(candidates).context(NoCandidateProcessSnafu {
            deployment: record.name.clone(),
            selector: record.selector.to_string(),
        })?;
        tracing::info!(
            deployment = %record.name,
            process = %best.name,
            phase = %best.phase,
            candidates = count,
            "selected application process"
        );
        Ok(best.name)
    }
}

fn parse_namespace(namespace: &str) -> Result<Namespace, LogsError> {
    if namespace.is_empty() {
        return Err(LogsError::MissingNamespace);
    }
    Namespace::new(namespace).context(InvalidNamespaceSnafu)
}
