//! Configuration loading for DhruvaNBV

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vastu_ig::EstimatorConfig;

use crate::error::{NbvError, Result};
use crate::planner::PlannerConfig;
use crate::simulation::SimulationConfig;

/// Main configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NbvConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Channel call bounds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Timeout for any robot call in milliseconds (default: 5000)
    #[serde(default = "default_robot_timeout")]
    pub robot_timeout_ms: u64,

    /// Timeout for one information gain query in milliseconds (default: 30000)
    #[serde(default = "default_world_model_timeout")]
    pub world_model_timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            robot_timeout_ms: default_robot_timeout(),
            world_model_timeout_ms: default_world_model_timeout(),
        }
    }
}

impl ChannelConfig {
    pub fn robot_timeout(&self) -> Duration {
        Duration::from_millis(self.robot_timeout_ms)
    }

    pub fn world_model_timeout(&self) -> Duration {
        Duration::from_millis(self.world_model_timeout_ms)
    }
}

fn default_robot_timeout() -> u64 {
    5000
}
fn default_world_model_timeout() -> u64 {
    30000
}

impl NbvConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NbvError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: NbvConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.planner.validate()?;
        self.estimator.validate()?;
        self.simulation.validate()?;
        if self.channels.robot_timeout_ms == 0 || self.channels.world_model_timeout_ms == 0 {
            return Err(NbvError::Config(
                "channel timeouts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
