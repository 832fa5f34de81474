// ABOUTME: Capability traits for the control plane and the process runtime.
// ABOUTME: Defines ConfigStore, DeploymentStore, ProcessStore and the byte stream type.

use super::error::StoreError;
use crate::model::{
    DeploymentConfig, DeploymentRecord, LabelSelector, Process, ProcessLogOptions,
};
use crate::types::{ConfigName, DeploymentName, Namespace, ProcessName};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use std::pin::Pin;

/// Raw console output of a process, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StoreError>> + Send>>;

/// Read access to deployment configs.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch a config; `StoreError::NotFound` if it does not exist.
    async fn get_config(
        &self,
        namespace: &Namespace,
        name: &ConfigName,
    ) -> Result<DeploymentConfig, StoreError>;
}

/// Read access to deployment records.
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    /// Fetch a deployment record; `StoreError::NotFound` if it does not exist (yet).
    async fn get_deployment(
        &self,
        namespace: &Namespace,
        name: &DeploymentName,
    ) -> Result<DeploymentRecord, StoreError>;
}

/// Process listing and console output.
#[async_trait]
pub trait ProcessStore: Send + Sync {
    /// List the processes whose labels satisfy `selector`.
    async fn list_processes(
        &self,
        namespace: &Namespace,
        selector: &LabelSelector,
    ) -> Result<Vec<Process>, StoreError>;

    /// Fetch one process by name; `StoreError::NotFound` if it does not exist (yet).
    async fn get_process(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
    ) -> Result<Process, StoreError>;

    /// Open the console output of a process.
    async fn open_log_stream(
        &self,
        namespace: &Namespace,
        name: &ProcessName,
        opts: &ProcessLogOptions,
    ) -> Result<ByteStream, StoreError>;
}

/// Cut a byte stream off after `limit` bytes.
///
/// The stream ends as soon as the limit is reached, even if the source would
/// keep producing (a followed process).
pub fn take_bytes(stream: ByteStream, limit: u64) -> ByteStream {
    Box::pin(stream::unfold(
        (stream, limit),
        |(mut stream, remaining)| async move {
            if remaining == 0 {
                return None;
            }
            let mut chunk = match stream.next().await? {
                Ok(chunk) => chunk,
                Err(e) => return Some((Err(e), (stream, remaining))),
            };
            if chunk.len() as u64 > remaining {
                chunk.truncate(remaining as usize);
            }
            let remaining = remaining - chunk.len() as u64;
            Some((Ok(chunk), (stream, remaining)))
        },
    ))
}
