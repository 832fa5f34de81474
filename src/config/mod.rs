// ABOUTME: Settings for deploylog, read from deploylog.yml.
// ABOUTME: Handles YAML parsing, file discovery, and defaults.

mod runtime;
mod wait;

pub use runtime::RuntimeSettings;
pub use wait::WaitSettings;

use crate::error::{Error, Result};
use crate::types::Namespace;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "deploylog.yml";
pub const CONFIG_FILENAME_ALT: &str = "deploylog.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".deploylog/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_namespace")]
    pub namespace: Namespace,

    /// Root of the manifest directory holding configs and deployments.
    #[serde(default = "default_manifests")]
    pub manifests: PathBuf,

    #[serde(default)]
    pub wait: WaitSettings,

    #[serde(default)]
    pub runtime: RuntimeSettings,
}

fn default_namespace() -> Namespace {
    Namespace::new("default").expect("\"default\" is a valid namespace")
}

fn default_manifests() -> PathBuf {
    PathBuf::from("manifests")
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            namespace: default_namespace(),
            manifests: default_manifests(),
            wait: WaitSettings::default(),
            runtime: RuntimeSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.wait.validate().map_err(Error::InvalidConfig)?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_yaml(&content)?;

        // Relative manifest paths are relative to the settings file.
        if settings.manifests.is_relative()
            && let Some(parent) = path.parent()
        {
            settings.manifests = parent.join(&settings.manifests);
        }
        Ok(settings)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Discover settings in `dir`, falling back to defaults rooted there.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => {
                tracing::debug!(dir = %dir.display(), "no settings file found, using defaults");
                Ok(Settings {
                    manifests: dir.join(default_manifests()),
                    ..Settings::default()
                })
            }
            other => other,
        }
    }
}
