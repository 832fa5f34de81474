// ABOUTME: Control plane backed by a directory of YAML manifests.
// ABOUTME: Re-reads files on every lookup so external writers are observed.

use super::error::StoreError;
use super::traits::{ConfigStore, DeploymentStore};
use crate::model::{DeploymentConfig, DeploymentRecord, DeploymentStatus, LabelSelector};
use crate::types::{ConfigName, DeploymentName, Namespace};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const CONFIGS_DIR: &str = "configs";
const DEPLOYMENTS_DIR: &str = "deployments";

/// Reads deployment configs and records from
/// `<root>/<namespace>/configs/<name>.yml` and
/// `<root>/<namespace>/deployments/<name>.yml`.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigManifest {
    #[serde(default)]
    latest_version: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentManifest {
    #[serde(default)]
    selector: LabelSelector,
    #[serde(default)]
    status: Option<DeploymentStatus>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
}

impl ManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_path(
        &self,
        namespace: &Namespace,
        dir: &str,
        name: &str,
    ) -> Result<PathBuf, StoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self
            .root
            .join(namespace.as_str())
            .join(dir)
            .join(format!("{}.yml", name)))
    }

    async fn read_manifest<T: for<'de> Deserialize<'de>>(
        path: &Path,
        kind: &'static str,
        name: &str,
    ) -> Result<T, StoreError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(kind, name));
            }
            Err(e) => return Err(e.into()),
        };
        serde_yaml::from_str(&content).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ConfigStore for ManifestStore {
    async fn get_config(
        &self,
        namespace: &Namespace,
        name: &ConfigName,
    ) -> Result<DeploymentConfig, StoreError> {
        let path = self.manifest_path(namespace, CONFIGS_DIR, name.as_str())?;
        let manifest: ConfigManifest =
            Self::read_manifest(&path, "deployment config", name.as_str()).await?;
        Ok(DeploymentConfig {
            namespace: namespace.clone(),
            name: name.clone(),
            latest_version: manifest.latest_version,
        })
    }
}

#[async_trait]
impl DeploymentStore for ManifestStore {
    async fn get_deployment(
        &self,
        namespace: &Namespace,
        name: &DeploymentName,
    ) -> Result<DeploymentRecord, StoreError> {
        let path = self.manifest_path(namespace, DEPLOYMENTS_DIR, name.as_str())?;
        let manifest: DeploymentManifest =
            Self::read_manifest(&path, "deployment", name.as_str()).await?;

        let mut record = DeploymentRecord::new(namespace.clone(), name.clone(), manifest.selector);
        record.annotations = manifest.annotations;
        // An explicit status field wins over the annotation.
        if let Some(status) = manifest.status {
            record.set_status(status);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn ns() -> Namespace {
        Namespace::new("default").unwrap()
    }

    #[tokio::test]
    async fn reads_config_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default/configs/myapp.yml", "latestVersion: 3\n");

        let store = ManifestStore::new(dir.path());
        let config = store
            .get_config(&ns(), &ConfigName::new("myapp"))
            .await
            .unwrap();
        assert_eq!(config.latest_version, 3);
        assert_eq!(config.name.as_str(), "myapp");
    }

    #[tokio::test]
    async fn missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let err = store
            .get_deployment(&ns(), &DeploymentName::new("myapp-1"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn reads_deployment_status_and_selector() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default/deployments/myapp-2.yml",
            "selector:\n  deployment: myapp-2\nstatus: Running\n",
        );

        let store = ManifestStore::new(dir.path());
        let record = store
            .get_deployment(&ns(), &DeploymentName::new("myapp-2"))
            .await
            .unwrap();
        assert_eq!(record.status(), Some(DeploymentStatus::Running));
        assert_eq!(record.selector.to_string(), "deployment=myapp-2");
    }

    #[tokio::test]
    async fn malformed_manifest_is_not_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default/configs/broken.yml", "latestVersion: [\n");

        let store = ManifestStore::new(dir.path());
        let err = store
            .get_config(&ns(), &ConfigName::new("broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let err = store
            .get_config(&ns(), &ConfigName::new("../secrets"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }
}
