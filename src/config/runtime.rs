// ABOUTME: Container runtime connection settings.
// ABOUTME: Optional explicit socket path, otherwise the local default.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    /// Unix socket of a Docker-compatible API (Docker or Podman).
    #[serde(default)]
    pub socket: Option<String>,
}
