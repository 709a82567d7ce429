use hollow_sync::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigResult;

/// Timing of the page's visual delays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Wait after mount before the page leaves `Idle` (ms).
    pub reveal_delay_ms: u64,
    /// Fade-in after every stage change (ms).
    pub fade_delay_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 1_000,
            fade_delay_ms: 1_000,
        }
    }
}

impl FlowConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn fade_delay(&self) -> Duration {
        Duration::from_millis(self.fade_delay_ms)
    }
}

/// Settings for the whole site. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub sync: SyncConfig,
    pub flow: FlowConfig,
}

impl SiteConfig {
    /// Parses a JSON document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        debug!("Loaded site config from {}", path.display());
        Ok(config)
    }
}
