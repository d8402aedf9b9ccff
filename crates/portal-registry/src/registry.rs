//! Loaded module list with availability.

use std::path::Path;

use futures_util::future::join_all;
use portal_telemetry::Metrics;
use tracing::{info, warn};

use crate::error::RegistryResult;
use crate::manifest::{ModuleManifest, ModuleWithAvailability};
use crate::probe::ModuleProbe;

/// Every manifest module tagged with whether it can be mounted.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleWithAvailability>,
}

impl ModuleRegistry {
    /// Probe every module concurrently, keeping manifest order.
    pub async fn load(manifest: ModuleManifest, probe: &ModuleProbe) -> Self {
        let checks = manifest.modules.iter().map(|m| probe.is_available(m));
        let results = join_all(checks).await;

        let modules: Vec<_> = manifest
            .modules
            .into_iter()
            .zip(results)
            .map(|(module, available)| {
                Metrics::module_available(&module.id, available);
                if !available {
                    warn!(module = %module.id, base_url = %module.base_url, "Module unavailable");
                }
                ModuleWithAvailability { module, available }
            })
            .collect();

        info!(
            total = modules.len(),
            available = modules.iter().filter(|m| m.available).count(),
            "Module registry loaded"
        );
        Self { modules }
    }

    /// Read the manifest at `path` and probe it.
    pub async fn from_file(path: impl AsRef<Path>, probe: &ModuleProbe) -> RegistryResult<Self> {
        let manifest = ModuleManifest::from_file(path)?;
        Ok(Self::load(manifest, probe).await)
    }

    pub fn modules(&self) -> &[ModuleWithAvailability] {
        &self.modules
    }

    /// Modules that passed their probe, in manifest order.
    pub fn available(&self) -> Vec<&ModuleWithAvailability> {
        self.modules.iter().filter(|m| m.available).collect()
    }

    pub fn find(&self, id: &str) -> Option<&ModuleWithAvailability> {
        self.modules.iter().find(|m| m.module.id == id)
    }
}
