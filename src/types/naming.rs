// ABOUTME: Deterministic naming of deployments and deployer processes.
// ABOUTME: Derives object names from a config name and a version number.

use super::id::{ConfigName, DeploymentName, ProcessName};

/// Suffix appended to a deployment name to name its deployer process.
pub const DEPLOYER_SUFFIX: &str = "deploy";

/// Name of the deployment record for `version` of `config`.
///
/// The version is always the last `-`-separated segment, so two different
/// versions of one config never collide.
pub fn deployment_name(config: &ConfigName, version: i64) -> DeploymentName {
    DeploymentName::new(format!("{}-{}", config, version))
}

/// Name of the process that performs the given deployment.
pub fn deployer_name(deployment: &DeploymentName) -> ProcessName {
    ProcessName::new(format!("{}-{}", deployment, DEPLOYER_SUFFIX))
}

/// Recover the version from a deployment name produced by [`deployment_name`].
pub fn version_of(deployment: &DeploymentName) -> Option<i64> {
    deployment
        .as_str()
        .rsplit_once('-')
        .and_then(|(_, version)| version.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_name_joins_config_and_version() {
        let config = ConfigName::new("myapp");
        assert_eq!(deployment_name(&config, 3).as_str(), "myapp-3");
    }

    #[test]
    fn deployer_name_derives_from_deployment() {
        let deployment = DeploymentName::new("myapp-3");
        assert_eq!(deployer_name(&deployment).as_str(), "myapp-3-deploy");
    }

    #[test]
    fn version_round_trips_through_name() {
        let config = ConfigName::new("my-app-2");
        let name = deployment_name(&config, 14);
        assert_eq!(version_of(&name), Some(14));
    }
}
