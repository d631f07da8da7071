//! Mirror strategy configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Mirror strategy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Which strategy produces reflections
    #[serde(default)]
    pub strategy: MirrorStrategy,

    /// Base URL of the reflection service (remote strategy only)
    pub service_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional API key for the reflection service
    pub api_key: Option<String>,
}

/// Mirror strategy type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MirrorStrategy {
    /// Local deterministic rule tables
    #[default]
    RuleBased,
    /// Remote reflection service with gentle fallback
    Remote,
}

impl MirrorConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate mirror configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.strategy == MirrorStrategy::Remote {
            let Some(url) = self.service_url.as_deref() else {
                return Err(ValidationError::MissingRequired("MIRROR__SERVICE_URL"));
            };
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidServiceUrl);
            }
        }

        Ok(())
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            strategy: MirrorStrategy::default(),
            service_url: None,
            timeout_secs: default_timeout(),
            api_key: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
