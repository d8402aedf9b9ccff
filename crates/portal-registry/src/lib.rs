//! Remote module discovery for the host shell.
//!
//! Reads the module manifest and probes each remote's origin so the shell
//! only mounts modules that answer.

pub mod error;
pub mod manifest;
pub mod probe;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use manifest::{ModuleConfig, ModuleManifest, ModuleWithAvailability};
pub use probe::{ModuleProbe, PROBE_TIMEOUT};
pub use registry::ModuleRegistry;
