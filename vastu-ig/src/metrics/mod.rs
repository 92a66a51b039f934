//! Information gain metrics.
//!
//! A metric observes the samples of every ray cast for one query and reduces
//! them to a single predicted gain. The estimator drives each metric through
//! the same sequence per ray:
//!
//! ```text
//! begin_ray → include_ray_sample* → [include_endpoint] → end_ray
//! ```
//!
//! `include_endpoint` is only called when the ray stops on a confident
//! occupied voxel; rays that run out of depth or leave the map end without it.
//!
//! ## Built-in metrics
//!
//! | Name | Counts |
//! |------|--------|
//! | `occlusion_aware_total_ig` | visibility-weighted entropy of all visible voxels |
//! | `unobserved_voxel_ig` | unknown voxels a ray passes |
//! | `rear_side_voxel_ig` | unknown voxels directly in front of an occupied hit |
//! | `rear_side_entropy_ig` | visibility-weighted entropy of those voxels |
//! | `proximity_count_ig` | unknown voxels touching an occupied voxel |
//! | `average_entropy_ig` | mean entropy over all sampled voxels |

mod counting;
mod entropy;

pub use counting::{ProximityCountIg, RearSideVoxelIg, UnobservedVoxelIg};
pub use entropy::{AverageEntropyIg, OcclusionAwareTotalIg, RearSideEntropyIg};

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::VoxelCoord;
use crate::map::OccupancyModel;

/// Binary entropy (nats) of an occupancy probability.
#[inline]
pub fn entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -p * p.ln() - (1.0 - p) * (1.0 - p).ln()
}

/// One voxel sampled along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelSample {
    /// Voxel index
    pub coord: VoxelCoord,
    /// Stored likelihood, `None` if unknown
    pub occupancy: Option<f64>,
    /// Likelihood used for computation (`occupancy` or the unknown prior)
    pub probability: f64,
    /// Distance from the sensor at which the ray enters the voxel
    pub depth: f64,
    /// Probability that the ray reaches this voxel unobstructed
    pub visibility: f64,
}

impl VoxelSample {
    /// Check whether the voxel was never observed.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.occupancy.is_none()
    }

    /// Entropy of the voxel's occupancy.
    #[inline]
    pub fn entropy(&self) -> f64 {
        entropy(self.probability)
    }
}

/// Parameters shared by all metric instances of one query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricParams {
    /// Occupancy probability assumed for unknown voxels
    pub unknown_prior: f64,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self { unknown_prior: 0.5 }
    }
}

/// Accumulates one information gain value over the rays of a query.
pub trait IgMetric: Send {
    /// Registered name of the metric.
    fn name(&self) -> &str;

    /// Called before the first sample of each ray.
    fn begin_ray(&mut self) {}

    /// A sample the ray passes through (free, unknown or below the pass-through threshold).
    fn include_ray_sample(&mut self, sample: &VoxelSample, map: &dyn OccupancyModel);

    /// The confident occupied voxel that stopped the ray.
    fn include_endpoint(&mut self, sample: &VoxelSample, map: &dyn OccupancyModel);

    /// Called after the last sample of each ray.
    fn end_ray(&mut self) {}

    /// Reduced gain over all rays seen so far.
    fn information_gain(&self) -> f64;
}

/// Constructor for a metric instance.
pub type MetricFactory = Arc<dyn Fn(&MetricParams) -> Box<dyn IgMetric> + Send + Sync>;

/// Name → constructor table used to resolve requested metric names.
#[derive(Clone, Default)]
pub struct MetricRegistry {
    factories: HashMap<String, MetricFactory>,
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("metrics", &self.names())
            .finish()
    }
}

impl MetricRegistry {
    /// Registry without any metrics.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding all built-in metrics.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(OcclusionAwareTotalIg::NAME, |_| {
            Box::new(OcclusionAwareTotalIg::new())
        });
        registry.register(UnobservedVoxelIg::NAME, |_| Box::new(UnobservedVoxelIg::new()));
        registry.register(RearSideVoxelIg::NAME, |_| Box::new(RearSideVoxelIg::new()));
        registry.register(RearSideEntropyIg::NAME, |_| Box::new(RearSideEntropyIg::new()));
        registry.register(ProximityCountIg::NAME, |_| Box::new(ProximityCountIg::new()));
        registry.register(AverageEntropyIg::NAME, |_| Box::new(AverageEntropyIg::new()));
        registry
    }

    /// Register (or replace) a metric constructor under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&MetricParams) -> Box<dyn IgMetric> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate a metric, `None` if the name is unknown.
    pub fn create(&self, name: &str, params: &MetricParams) -> Option<Box<dyn IgMetric>> {
        self.factories.get(name).map(|factory| factory(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_entropy_values() {
        assert_relative_eq!(entropy(0.5), std::f64::consts::LN_2, epsilon = 1e-12);
        assert_eq!(entropy(0.0), 0.0);
        assert_eq!(entropy(1.0), 0.0);
        assert_relative_eq!(entropy(0.2), entropy(0.8), epsilon = 1e-12);
    }

    #[test]
    fn test_default_registry_names() {
        let registry = MetricRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "average_entropy_ig",
                "occlusion_aware_total_ig",
                "proximity_count_ig",
                "rear_side_entropy_ig",
                "rear_side_voxel_ig",
                "unobserved_voxel_ig",
            ]
        );
        assert!(registry.create("nope", &MetricParams::default()).is_none());
        let metric = registry
            .create("unobserved_voxel_ig", &MetricParams::default())
            .unwrap();
        assert_eq!(metric.name(), "unobserved_voxel_ig");
    }
}
