// ABOUTME: Deployment configs, deployment records, and deployment status.
// ABOUTME: Status is read from an annotation written by the deployer.

use super::selector::LabelSelector;
use crate::types::{ConfigName, DeploymentName, Namespace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Annotation carrying the deployment status on a deployment record.
pub const STATUS_ANNOTATION: &str = "deploylog.io/deployment.phase";

/// Logical definition of a deployable workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub namespace: Namespace,
    pub name: ConfigName,
    /// Version of the most recent deployment; 0 means never deployed.
    pub latest_version: i64,
}

/// Status of one deployment, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeploymentStatus {
    New,
    Pending,
    Running,
    Failed,
    Complete,
}

impl DeploymentStatus {
    /// Whether the deployer has started working (or finished).
    pub fn has_started(self) -> bool {
        !matches!(self, DeploymentStatus::New | DeploymentStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::New => "New",
            DeploymentStatus::Pending => "Pending",
            DeploymentStatus::Running => "Running",
            DeploymentStatus::Failed => "Failed",
            DeploymentStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown deployment status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for DeploymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(DeploymentStatus::New),
            "Pending" => Ok(DeploymentStatus::Pending),
            "Running" => Ok(DeploymentStatus::Running),
            "Failed" => Ok(DeploymentStatus::Failed),
            "Complete" => Ok(DeploymentStatus::Complete),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// The materialized deployment of one config version.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRecord {
    pub namespace: Namespace,
    pub name: DeploymentName,
    /// Selects the application processes belonging to this deployment.
    pub selector: LabelSelector,
    pub annotations: BTreeMap<String, String>,
}

impl DeploymentRecord {
    pub fn new(namespace: Namespace, name: DeploymentName, selector: LabelSelector) -> Self {
        Self {
            namespace,
            name,
            selector,
            annotations: BTreeMap::new(),
        }
    }

    /// Current status, or `None` when the annotation is missing or unrecognised.
    pub fn status(&self) -> Option<DeploymentStatus> {
        self.annotations
            .get(STATUS_ANNOTATION)
            .and_then(|s| s.parse().ok())
    }

    pub fn with_status(mut self, status: DeploymentStatus) -> Self {
        self.set_status(status);
        self
    }

    pub fn set_status(&mut self, status: DeploymentStatus) {
        self.annotations
            .insert(STATUS_ANNOTATION.to_string(), status.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DeploymentRecord {
        DeploymentRecord::new(
            Namespace::new("default").unwrap(),
            DeploymentName::new("myapp-1"),
            LabelSelector::new().with("deployment", "myapp-1"),
        )
    }

    #[test]
    fn missing_annotation_has_no_status() {
        assert_eq!(record().status(), None);
    }

    #[test]
    fn garbage_annotation_has_no_status() {
        let mut r = record();
        r.annotations
            .insert(STATUS_ANNOTATION.to_string(), "Exploded".to_string());
        assert_eq!(r.status(), None);
    }

    #[test]
    fn status_round_trips_through_annotation() {
        let r = record().with_status(DeploymentStatus::Complete);
        assert_eq!(r.status(), Some(DeploymentStatus::Complete));
    }

    #[test]
    fn started_statuses() {
        assert!(!DeploymentStatus::New.has_started());
        assert!(!DeploymentStatus::Pending.has_started());
        assert!(DeploymentStatus::Running.has_started());
        assert!(DeploymentStatus::Failed.has_started());
        assert!(DeploymentStatus::Complete.has_started());
    }
}
