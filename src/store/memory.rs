// ABOUTME: In-memory control plane implementing every store trait.
// ABOUTME: Lets callers mutate objects while a log request is waiting on them.

use super::error::StoreError;
use super::traits::{ByteStream, ConfigStore, DeploymentStore, ProcessStore, take_bytes};
use crate::model::{
    DeploymentConfig, DeploymentRecord, DeploymentStatus, LabelSelector, Process, ProcessLogOptions,
    ProcessPhase,
};
use crate::types::{ConfigName, DeploymentName, Namespace, ProcessName};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct ProcessEntry {
    process: Process,
    output: Vec<Bytes>,
}

#[derive(Debug, Default)]
struct State {
    configs: HashMap<(Namespace, ConfigName), DeploymentConfig>,
    deployments: HashMap<(Namespace, DeploymentName), DeploymentRecord>,
    processes: HashMap<(Namespace, ProcessName), ProcessEntry>,
    deployment_fault: Option<String>,
    list_fault: Option<String>,
    open_fault: Option<String>,
}

/// A control plane held entirely in memory.
///
/// Cloning is cheap and clones share state, so one handle can be given to the
/// log resolver while another plays the part of the deployer.
#[derive(Debug, Clone, Default)]
pub struct MemoryControlPlane {
    state: Arc<RwLock<State>>,
    log_opens: Arc<AtomicUsize>,
}

impl MemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_config(&self, config: DeploymentConfig) {
        let key = (config.namespace.clone(), config.name.clone());
        self.state.write().configs.insert(key, config);
    }

    pub fn put_deployment(&self, record: DeploymentRecord) {
        let key = (record.namespace.clone(), record.name.clone());
        self.state.write().deployments.insert(key, record);
    }

    pub fn remove_deployment(&self, namespace: &Namespace, name: &DeploymentName) {
        self.state
            .write()
            .deployments
            .remove(&(namespace.clone(), name.clone()));
    }

    /// Update the status of an existing deployment record.
    pub fn set_deployment_status(
        &self,
        namespace: &Namespace,
        name: &DeploymentName,
        status: DeploymentStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let record = state
            .deployments
            .get_mut(&(namespace.clone(), name.clone()))
            .ok_or_else(|| StoreError::not_found("deployment", name.as_str()))?;
        record.set_status(status);
        Ok(())
    }

    /// Register a process with the console output it will produce.
    pub fn put_process(&self, namespace: &Namespace, process: Process, output: &[&str]) {
        let key = (namespace.clone(), process.name.clone());
        let output = output
            .iter()
            .map(|line| Bytes::copy_from_slice(line.as_bytes()))
            .collect();
        self.state
            .write()
            .processes
            .insert(key, ProcessEntry { process, output });
    }

    pub fn set_process_phase(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
        phase: ProcessPhase,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let entry = state
            .processes
            .get_mut(&(namespace.clone(), name.clone()))
            .ok_or_else(|| StoreError::not_found("process", name.as_str()))?;
        entry.process.phase = phase;
        Ok(())
    }

    /// Make every deployment read fail with a runtime error.
    pub fn fail_deployment_reads(&self, message: impl Into<String>) {
        self.state.write().deployment_fault = Some(message.into());
    }

    /// Make every process listing fail with a runtime error.
    pub fn fail_process_listing(&self, message: impl Into<String>) {
        self.state.write().list_fault = Some(message.into());
    }

    /// Make every attempt to open a log stream fail with a stream error.
    pub fn fail_log_streams(&self, message: impl Into<String>) {
        self.state.write().open_fault = Some(message.into());
    }

    /// How many log streams have been opened so far.
    pub fn log_opens(&self) -> usize {
        self.log_opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStore for MemoryControlPlane {
    async fn get_config(
        &self,
        namespace: &Namespace,
        name: &ConfigName,
    ) -> Result<DeploymentConfig, StoreError> {
        self.state
            .read()
            .configs
            .get(&(namespace.clone(), name.clone()))
            .cloned()
            .ok_or_else(|| StoreError::not_found("deployment config", name.as_str()))
    }
}

#[async_trait]
impl DeploymentStore for MemoryControlPlane {
    async fn get_deployment(
        &self,
        namespace: &Namespace,
        name: &DeploymentName,
    ) -> Result<DeploymentRecord, StoreError> {
        let state = self.state.read();
        if let Some(message) = &state.deployment_fault {
            return Err(StoreError::Runtime(message.clone()));
        }
        state
            .deployments
            .get(&(namespace.clone(), name.clone()))
            .cloned()
            .ok_or_else(|| StoreError::not_found("deployment", name.as_str()))
    }
}

#[async_trait]
impl ProcessStore for MemoryControlPlane {
    async fn list_processes(
        &self,
        namespace: &Namespace,
        selector: &LabelSelector,
    ) -> Result<Vec<Process>, StoreError> {
        let state = self.state.read();
        if let Some(message) = &state.list_fault {
            return Err(StoreError::Runtime(message.clone()));
        }
        Ok(state
            .processes
            .iter()
            .filter(|((ns, _), entry)| ns == namespace && selector.matches(&entry.process.labels))
            .map(|(_, entry)| entry.process.clone())
            .collect())
    }

    async fn get_process(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
    ) -> Result<Process, StoreError> {
        self.state
            .read()
            .processes
            .get(&(namespace.clone(), name.clone()))
            .map(|entry| entry.process.clone())
            .ok_or_else(|| StoreError::not_found("process", name.as_str()))
    }

    async fn open_log_stream(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
        opts: &ProcessLogOptions,
    ) -> Result<ByteStream, StoreError> {
        let entry = {
            let state = self.state.read();
            if let Some(message) = &state.open_fault {
                return Err(StoreError::Stream(message.clone()));
            }
            state
                .processes
                .get(&(namespace.clone(), name.clone()))
                .cloned()
                .ok_or_else(|| StoreError::not_found("process", name.as_str()))?
        };
        self.log_opens.fetch_add(1, Ordering::SeqCst);

        let mut output = entry.output;
        if let Some(tail) = opts.tail_lines {
            let skip = output.len().saturating_sub(tail as usize);
            output.drain(..skip);
        }

        let recorded = stream::iter(output.into_iter().map(Ok::<Bytes, StoreError>));
        // A followed process that is still running never ends on its own.
        let body: ByteStream = if opts.follow && entry.process.phase == ProcessPhase::Running {
            Box::pin(futures::StreamExt::chain(recorded, stream::pending()))
        } else {
            Box::pin(recorded)
        };

        Ok(match opts.limit_bytes {
            Some(limit) => take_bytes(body, limit),
            None => body,
        })
    }
}
