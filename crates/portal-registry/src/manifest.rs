//! Module manifest: which remotes the host shell can mount.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// One remote module entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub id: String,
    /// Route the host mounts the module under, e.g. `/oms`.
    pub path: String,
    pub label: String,
    pub icon: String,
    /// Origin serving the module. Empty means served by the host itself.
    #[serde(default)]
    pub base_url: String,
}

/// Parsed `module.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl ModuleManifest {
    pub fn from_json(json: &str) -> RegistryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| RegistryError::ManifestRead {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&content)
    }
}

/// A module with the result of its availability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleWithAvailability {
    #[serde(flatten)]
    pub module: ModuleConfig,
    pub available: bool,
}
