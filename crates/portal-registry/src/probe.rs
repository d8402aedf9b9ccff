//! HTTP availability probe for remote modules.

use std::time::Duration;

use reqwest::{Client, Method};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::manifest::ModuleConfig;

/// Per-request timeout for health checks.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Checks whether a module's origin answers.
pub struct ModuleProbe {
    client: Client,
    host_origin: String,
}

impl ModuleProbe {
    /// Create a probe for modules mounted by the host at `host_origin`.
    pub fn new(host_origin: impl Into<String>) -> RegistryResult<Self> {
        Self::with_timeout(host_origin, PROBE_TIMEOUT)
    }

    pub fn with_timeout(host_origin: impl Into<String>, timeout: Duration) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            host_origin: host_origin.into(),
        })
    }

    /// Modules served by the host itself need no probe.
    pub fn is_local(&self, module: &ModuleConfig) -> bool {
        module.base_url.is_empty() || module.base_url == self.host_origin
    }

    /// `HEAD` the module origin, retrying with `GET` if the request fails
    /// outright. Available iff the answer is 2xx.
    pub async fn is_available(&self, module: &ModuleConfig) -> bool {
        if self.is_local(module) {
            return true;
        }
        match self.request(Method::HEAD, &module.base_url).await {
            Ok(ok) => ok,
            Err(e) => {
                debug!(module = %module.id, error = %e, "HEAD probe failed, retrying with GET");
                self.request(Method::GET, &module.base_url)
                    .await
                    .unwrap_or(false)
            }
        }
    }

    async fn request(&self, method: Method, url: &str) -> Result<bool, reqwest::Error> {
        let response = self.client.request(method, url).send().await?;
        Ok(response.status().is_success())
    }
}
