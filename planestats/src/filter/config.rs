use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{CpuLevel, Error, Result};

/// User-facing filter settings. Every field is optional in YAML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneStatsConfig {
    /// Prefix of the published property names.
    pub prop: String,
    /// Index of the measured plane.
    pub plane: usize,
    pub cpu: CpuLevel,
}

impl Default for PlaneStatsConfig {
    fn default() -> Self {
        PlaneStatsConfig {
            prop: "PlaneStats".to_string(),
            plane: 0,
            cpu: CpuLevel::Max,
        }
    }
}

impl PlaneStatsConfig {
    pub fn from_yaml(text: &str) -> Result<PlaneStatsConfig> {
        Ok(serde_yml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<PlaneStatsConfig> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        PlaneStatsConfig::from_yaml(&text)
    }
}
