//! Estimator configuration.
//!
//! ```toml
//! max_rays = 4000000
//!
//! [camera]
//! width = 640
//! height = 480
//! fx = 525.0
//! fy = 525.0
//! cx = 320.0
//! cy = 240.0
//!
//! [metrics]
//! unknown_prior = 0.5
//! ```

use serde::{Deserialize, Serialize};

use crate::error::IgError;
use crate::metrics::MetricParams;
use crate::raycast::CameraModel;

/// Default upper bound on rays cast for one view.
pub const DEFAULT_MAX_RAYS: usize = 4_000_000;

/// Static settings of an [`crate::InformationGainEstimator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Sensor intrinsics used to generate rays
    pub camera: CameraModel,
    /// Parameters handed to every metric instance
    pub metrics: MetricParams,
    /// Commands needing more rays than this are rejected (default: 4_000_000)
    pub max_rays: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            camera: CameraModel::default(),
            metrics: MetricParams::default(),
            max_rays: DEFAULT_MAX_RAYS,
        }
    }
}

impl EstimatorConfig {
    /// Check camera intrinsics and metric parameters.
    pub fn validate(&self) -> Result<(), IgError> {
        if !self.camera.is_valid() {
            return Err(IgError::ConfigurationInvalid(format!(
                "invalid camera intrinsics: {:?}",
                self.camera
            )));
        }
        if !(0.0..=1.0).contains(&self.metrics.unknown_prior) {
            return Err(IgError::ConfigurationInvalid(format!(
                "unknown prior must be in [0, 1], got {}",
                self.metrics.unknown_prior
            )));
        }
        if self.max_rays == 0 {
            return Err(IgError::ConfigurationInvalid(
                "max_rays must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
