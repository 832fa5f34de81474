// ABOUTME: Processes that belong to a deployment and their lifecycle phases.
// ABOUTME: Covers both the deployer process and application processes.

use crate::types::ProcessName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle phase of a process as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProcessPhase {
    Running,
    Pending,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl ProcessPhase {
    /// Whether the process has produced output that can be read.
    pub fn has_logs(self) -> bool {
        matches!(
            self,
            ProcessPhase::Running | ProcessPhase::Succeeded | ProcessPhase::Failed
        )
    }

    /// Preference when choosing a process to read logs from; lower is better.
    pub fn log_rank(self) -> u8 {
        match self {
            ProcessPhase::Running => 0,
            ProcessPhase::Unknown => 1,
            ProcessPhase::Pending => 2,
            ProcessPhase::Succeeded => 3,
            ProcessPhase::Failed => 4,
        }
    }
}

impl fmt::Display for ProcessPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessPhase::Running => "Running",
            ProcessPhase::Pending => "Pending",
            ProcessPhase::Succeeded => "Succeeded",
            ProcessPhase::Failed => "Failed",
            ProcessPhase::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A running or finished process as seen by the process store.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub name: ProcessName,
    pub phase: ProcessPhase,
    pub labels: BTreeMap<String, String>,
    /// When the runtime created the process, if it reports it.
    pub created: Option<DateTime<Utc>>,
}

impl Process {
    pub fn new(name: impl Into<String>, phase: ProcessPhase) -> Self {
        Self {
            name: ProcessName::new(name),
            phase,
            labels: BTreeMap::new(),
            created: None,
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}
