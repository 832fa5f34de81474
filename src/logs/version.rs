// ABOUTME: Chooses which deployment version a log request refers to.
// ABOUTME: Explicit version, else previous, else latest.

use crate::model::DeploymentConfig;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("no deployment exists for deploymentConfig {config:?}")]
    NoDeploymentYet { config: String },

    #[error("no previous deployment exists for deploymentConfig {config:?}")]
    NoPreviousDeployment { config: String },

    #[error("invalid version for deploymentConfig {config:?}: {version}")]
    InvalidVersion { config: String, version: i64 },
}

/// Resolve the desired deployment version of `config`.
///
/// An explicit `version` always wins over `previous`.
pub fn resolve_version(
    config: &DeploymentConfig,
    version: Option<i64>,
    previous: bool,
) -> Result<i64, VersionError> {
    let latest = config.latest_version;
    if latest <= 0 {
        return Err(VersionError::NoDeploymentYet {
            config: config.name.to_string(),
        });
    }

    match version {
        Some(v) if v < 1 || v > latest => Err(VersionError::InvalidVersion {
            config: config.name.to_string(),
            version: v,
        }),
        Some(v) => Ok(v),
        None if previous => {
            if latest - 1 < 1 {
                Err(VersionError::NoPreviousDeployment {
                    config: config.name.to_string(),
                })
            } else {
                Ok(latest - 1)
            }
        }
        None => Ok(latest),
    }
}
