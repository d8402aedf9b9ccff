//! Submission configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{OmsError, OmsResult};

/// Parameters of the simulated order backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Simulated network latency (ms). Default: 1200.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// A uniform draw in `[0, 1)` must exceed this to be accepted. Default: 0.15.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: f64,
}

fn default_delay_ms() -> u64 {
    1200
}

fn default_failure_threshold() -> f64 {
    0.15
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            failure_threshold: default_failure_threshold(),
        }
    }
}

impl SubmissionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> OmsResult<()> {
        if !(0.0..=1.0).contains(&self.failure_threshold) {
            return Err(OmsError::InvalidConfig(format!(
                "failure_threshold must be within [0, 1], got {}",
                self.failure_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SubmissionConfig::default();
        assert_eq!(config.delay(), Duration::from_millis(1200));
        assert_eq!(config.failure_threshold, 0.15);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SubmissionConfig = toml::from_str("delay_ms = 0").unwrap();
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.failure_threshold, 0.15);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = SubmissionConfig {
            failure_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(OmsError::InvalidConfig(_))));
    }
}
