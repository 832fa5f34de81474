// ABOUTME: Process store backed by a Docker-compatible container runtime.
// ABOUTME: Containers are processes; labels carry namespace and selector membership.

use super::error::StoreError;
use super::traits::{ByteStream, ProcessStore, take_bytes};
use crate::model::{LabelSelector, Process, ProcessLogOptions, ProcessPhase};
use crate::types::{Namespace, ProcessName};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, LogsOptions};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::collections::HashMap;

/// Label holding the namespace a container belongs to.
pub const NAMESPACE_LABEL: &str = "deploylog.namespace";

/// Seconds to wait on the runtime API before giving up on a request.
const API_TIMEOUT_SECS: u64 = 120;

fn map_runtime_error(e: bollard::errors::Error, name: &str) -> StoreError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            StoreError::not_found("process", name)
        }
        _ => StoreError::Runtime(format!("{}: {}", name, e)),
    }
}

/// Translate a container state and status line into a process phase.
///
/// Exit codes only appear in the status line (`"Exited (0) 3 minutes ago"`),
/// so a clean exit is recognised from there.
pub fn phase_for(state: &str, status: &str) -> ProcessPhase {
    match state {
        "running" | "paused" => ProcessPhase::Running,
        "created" | "restarting" => ProcessPhase::Pending,
        "exited" if status.starts_with("Exited (0)") => ProcessPhase::Succeeded,
        "exited" | "dead" | "removing" => ProcessPhase::Failed,
        _ => ProcessPhase::Unknown,
    }
}

/// The runtime's `since` parameter: a Unix timestamp, 0 for "from the start".
fn since_timestamp(opts: &ProcessLogOptions, now: DateTime<Utc>) -> i32 {
    let since = match (opts.since_seconds, opts.since_time) {
        (Some(secs), _) => {
            let secs = i64::try_from(secs).unwrap_or(i64::MAX);
            now.timestamp().saturating_sub(secs)
        }
        (None, Some(time)) => time.timestamp(),
        (None, None) => 0,
    };
    // Anything before the epoch means "everything".
    i32::try_from(since.max(0)).unwrap_or(i32::MAX)
}

/// Processes served by Docker or Podman over the Docker API.
#[derive(Debug, Clone)]
pub struct ContainerProcessStore {
    client: Docker,
}

impl ContainerProcessStore {
    /// Connect to the runtime at `socket`, or to the local default socket.
    pub fn connect(socket: Option<&str>) -> Result<Self, StoreError> {
        let client = match socket {
            Some(path) => {
                Docker::connect_with_unix(path, API_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            None => Docker::connect_with_local_defaults(),
        }
        .map_err(|e| StoreError::Runtime(format!("failed to connect to runtime: {}", e)))?;
        Ok(Self { client })
    }

    async fn list(
        &self,
        namespace: &Namespace,
        mut filters: HashMap<String, Vec<String>>,
    ) -> Result<Vec<Process>, StoreError> {
        filters
            .entry("label".to_string())
            .or_default()
            .push(format!("{}={}", NAMESPACE_LABEL, namespace));

        let opts = ListContainersOptions {
            all: true,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(|e| StoreError::Runtime(format!("failed to list containers: {}", e)))?;

        Ok(containers
            .into_iter()
            .map(|c| {
                let name = c
                    .names
                    .unwrap_or_default()
                    .first()
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_default();
                let state = c
                    .state
                    .map(|s| format!("{:?}", s).to_lowercase())
                    .unwrap_or_default();
                let status = c.status.unwrap_or_default();

                Process {
                    name: ProcessName::new(name),
                    phase: phase_for(&state, &status),
                    labels: c.labels.unwrap_or_default().into_iter().collect(),
                    created: c.created.and_then(|secs| DateTime::from_timestamp(secs, 0)),
                }
            })
            .collect())
    }
}

#[async_trait]
impl ProcessStore for ContainerProcessStore {
    async fn list_processes(
        &self,
        namespace: &Namespace,
        selector: &LabelSelector,
    ) -> Result<Vec<Process>, StoreError> {
        if selector.is_empty() {
            return Ok(Vec::new());
        }

        let labels = selector
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        let mut filters = HashMap::new();
        filters.insert("label".to_string(), labels);

        let processes = self.list(namespace, filters).await?;
        // The runtime already filtered; re-check so the selector contract holds
        // even against runtimes with loose label matching.
        Ok(processes
            .into_iter()
            .filter(|p| selector.matches(&p.labels))
            .collect())
    }

    async fn get_process(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
    ) -> Result<Process, StoreError> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![format!("^/{}$", name)]);

        self.list(namespace, filters)
            .await?
            .into_iter()
            .find(|p| &p.name == name)
            .ok_or_else(|| StoreError::not_found("process", name.as_str()))
    }

    async fn open_log_stream(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
        opts: &ProcessLogOptions,
    ) -> Result<ByteStream, StoreError> {
        // Refuse to read containers outside the namespace.
        self.get_process(namespace, name).await?;

        if opts.container.is_some() {
            tracing::debug!(process = %name, "container runtimes run one container per process; ignoring container option");
        }
        if opts.previous {
            tracing::warn!(process = %name, "previous container output is not retained by the runtime");
        }

        let log_opts = LogsOptions {
            follow: opts.follow,
            stdout: true,
            stderr: true,
            since: since_timestamp(opts, Utc::now()),
            timestamps: opts.timestamps,
            tail: opts
                .tail_lines
                .map(|n| n.to_string())
                .unwrap_or_else(|| "all".to_string()),
            ..Default::default()
        };

        let process = name.to_string();
        let stream = self
            .client
            .logs(name.as_str(), Some(log_opts))
            .map(move |result| {
                result
                    .map(|output| match output {
                        bollard::container::LogOutput::StdOut { message }
                        | bollard::container::LogOutput::StdErr { message }
                        | bollard::container::LogOutput::StdIn { message }
                        | bollard::container::LogOutput::Console { message } => message,
                    })
                    .map_err(|e| match map_runtime_error(e, &process) {
                        StoreError::Runtime(msg) => StoreError::Stream(msg),
                        other => other,
                    })
            });

        let body: ByteStream = Box::pin(stream);
        Ok(match opts.limit_bytes {
            Some(limit) => take_bytes(body, limit),
            None => body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_and_paused_are_running() {
        assert_eq!(phase_for("running", "Up 2 hours"), ProcessPhase::Running);
        assert_eq!(phase_for("paused", "Up 2 hours (Paused)"), ProcessPhase::Running);
    }

    #[test]
    fn clean_exit_is_succeeded() {
        assert_eq!(
            phase_for("exited", "Exited (0) 3 minutes ago"),
            ProcessPhase::Succeeded
        );
    }

    #[test]
    fn non_zero_exit_is_failed() {
        assert_eq!(
            phase_for("exited", "Exited (137) 1 second ago"),
            ProcessPhase::Failed
        );
        assert_eq!(phase_for("dead", ""), ProcessPhase::Failed);
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn since_seconds_counts_back_from_now() {
        let opts = ProcessLogOptions {
            since_seconds: Some(60),
            ..Default::default()
        };
        assert_eq!(since_timestamp(&opts, now()), 1_699_999_940);
    }

    #[test]
    fn huge_since_seconds_means_from_the_start() {
        let opts = ProcessLogOptions {
            since_seconds: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(since_timestamp(&opts, now()), 0);
    }

    #[test]
    fn since_time_and_default() {
        let opts = ProcessLogOptions {
            since_time: Some(now()),
            ..Default::default()
        };
        assert_eq!(since_timestamp(&opts, now()), 1_700_000_000);
        assert_eq!(since_timestamp(&ProcessLogOptions::default(), now()), 0);
    }

    #[test]
    fn created_is_pending() {
        assert_eq!(phase_for("created", "Created"), ProcessPhase::Pending);
        assert_eq!(phase_for("", ""), ProcessPhase::Unknown);
    }
}
