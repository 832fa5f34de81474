// ABOUTME: Error type shared by all control-plane and process stores.
// ABOUTME: Keeps "not found" distinguishable from every other failure.

use thiserror::Error;

/// Errors from reading the control plane or a process runtime.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid object name: {0:?}")]
    InvalidName(String),

    #[error("malformed manifest {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
