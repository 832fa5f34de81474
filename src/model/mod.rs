// ABOUTME: Control-plane objects read while resolving deployment logs.
// ABOUTME: Configs, deployment records, processes, selectors, and log options.

mod deployment;
mod options;
mod process;
mod selector;

pub use deployment::{
    DeploymentConfig, DeploymentRecord, DeploymentStatus, STATUS_ANNOTATION, UnknownStatus,
};
pub use options::{DeploymentLogOptions, InvalidOptions, ProcessLogOptions};
pub use process::{Process, ProcessPhase};
pub use selector::LabelSelector;
