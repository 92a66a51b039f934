//! Entropy-based metrics.

use crate::map::OccupancyModel;

use super::{IgMetric, VoxelSample};

/// Sum of visibility-weighted voxel entropy over every ray.
///
/// Each sample contributes `visibility × H(p)`; the occupied voxel that
/// stops a ray contributes the same way (surface observation).
#[derive(Clone, Debug, Default)]
pub struct OcclusionAwareTotalIg {
    total: f64,
}

impl OcclusionAwareTotalIg {
    /// Registered name.
    pub const NAME: &'static str = "occlusion_aware_total_ig";

    /// Create the metric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IgMetric for OcclusionAwareTotalIg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn include_ray_sample(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        self.total += sample.visibility * sample.entropy();
    }

    fn include_endpoint(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        self.total += sample.visibility * sample.entropy();
    }

    fn information_gain(&self) -> f64 {
        self.total
    }
}

/// Mean entropy over all samples, endpoints included.
#[derive(Clone, Debug, Default)]
pub struct AverageEntropyIg {
    sum: f64,
    samples: usize,
}

impl AverageEntropyIg {
    /// Registered name.
    pub const NAME: &'static str = "average_entropy_ig";

    /// Create the metric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IgMetric for AverageEntropyIg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn include_ray_sample(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        self.sum += sample.entropy();
        self.samples += 1;
    }

    fn include_endpoint(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        self.sum += sample.entropy();
        self.samples += 1;
    }

    fn information_gain(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.sum / self.samples as f64
        }
    }
}

/// Entropy of unknown voxels lying right in front of an occupied hit.
///
/// These are voxels on the unseen side of an already observed surface.
#[derive(Clone, Debug, Default)]
pub struct RearSideEntropyIg {
    total: f64,
    // visibility-weighted entropy of the previous sample if it was unknown
    pending: Option<f64>,
}

impl RearSideEntropyIg {
    /// Registered name.
    pub const NAME: &'static str = "rear_side_entropy_ig";

    /// Create the metric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IgMetric for RearSideEntropyIg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn begin_ray(&mut self) {
        self.pending = None;
    }

    fn include_ray_sample(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        self.pending = sample
            .is_unknown()
            .then(|| sample.visibility * sample.entropy());
    }

    fn include_endpoint(&mut self, _sample: &VoxelSample, _map: &dyn OccupancyModel) {
        if let Some(contribution) = self.pending.take() {
            self.total += contribution;
        }
    }

    fn information_gain(&self) -> f64 {
        self.total
    }
}
