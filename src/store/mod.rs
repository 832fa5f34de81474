// ABOUTME: Stores the log resolver reads from: control plane and process runtime.
// ABOUTME: Traits plus in-memory, YAML manifest, and container runtime implementations.

mod container;
mod error;
mod manifest;
mod memory;
mod traits;

pub use container::{ContainerProcessStore, NAMESPACE_LABEL, phase_for};
pub use error::StoreError;
pub use manifest::ManifestStore;
pub use memory::MemoryControlPlane;
pub use traits::{ByteStream, ConfigStore, DeploymentStore, ProcessStore, take_bytes};
