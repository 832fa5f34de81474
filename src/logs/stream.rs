// ABOUTME: Pass-through resource relaying a process's console output.
// ABOUTME: Flushes every chunk when following, buffers otherwise.

use crate::model::ProcessLogOptions;
use crate::store::{ByteStream, ProcessStore, StoreError};
use crate::types::{Namespace, ProcessName};
use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

pub const CONTENT_TYPE: &str = "text/plain";

/// Errors while relaying a log stream to its consumer.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("failed to read log stream: {0}")]
    Source(#[source] StoreError),

    #[error("failed to write logs: {0}")]
    Sink(#[from] std::io::Error),

    #[error("log stream cancelled")]
    Cancelled,
}

/// The console output of one process, ready to hand to a consumer.
pub struct LogStream {
    body: ByteStream,
    flush: bool,
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream")
            .field("flush", &self.flush)
            .field("content_type", &CONTENT_TYPE)
            .finish_non_exhaustive()
    }
}

impl LogStream {
    pub fn new(body: ByteStream, flush: bool) -> Self {
        Self { body, flush }
    }

    /// A stream with no content, for deployments that have not started.
    pub fn empty() -> Self {
        Self::new(Box::pin(stream::empty()), false)
    }

    /// Whether each chunk should reach the consumer as soon as it is read.
    pub fn flush(&self) -> bool {
        self.flush
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    pub fn into_inner(self) -> ByteStream {
        self.body
    }

    /// Relay the stream into `writer` until it ends or `cancel` fires.
    ///
    /// Returns the number of bytes written.
    pub async fn copy_to<W>(
        mut self,
        writer: &mut W,
        cancel: &CancellationToken,
    ) -> Result<u64, CopyError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0u64;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CopyError::Cancelled),
                next = self.body.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(CopyError::Source)?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
            if self.flush {
                writer.flush().await?;
            }
        }
        writer.flush().await?;
        Ok(written)
    }
}

impl Stream for LogStream {
    type Item = Result<Bytes, StoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.body.as_mut().poll_next(cx)
    }
}

/// Open the console output of `process` and wrap it for relaying.
///
/// Failures to open the stream are returned unchanged.
pub async fn open_log_stream(
    store: &dyn ProcessStore,
    namespace: &Namespace,
    process: &ProcessName,
    opts: &ProcessLogOptions,
) -> Result<LogStream, StoreError> {
    let body = store.open_log_stream(namespace, process, opts).await?;
    Ok(LogStream::new(body, opts.follow))
}
