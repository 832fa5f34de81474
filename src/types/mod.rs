// ABOUTME: Type-safe names and validated domain types.
// ABOUTME: Uses phantom types to keep config, deployment and process names apart.

mod id;
mod namespace;
mod naming;

pub use id::{ConfigName, DeploymentName, Name, ProcessName};
pub use namespace::{Namespace, NamespaceError};
pub use naming::{DEPLOYER_SUFFIX, deployer_name, deployment_name, version_of};
