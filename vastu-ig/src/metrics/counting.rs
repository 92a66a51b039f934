//! Voxel counting metrics.

use crate::map::OccupancyModel;

use super::{IgMetric, VoxelSample};

/// Number of unknown voxels passed by the rays.
#[derive(Clone, Debug, Default)]
pub struct UnobservedVoxelIg {
    count: u64,
}

impl UnobservedVoxelIg {
    /// Registered name.
    pub const NAME: &'static str = "unobserved_voxel_ig";

    /// Create the metric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IgMetric for UnobservedVoxelIg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn include_ray_sample(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        if sample.is_unknown() {
            self.count += 1;
        }
    }

    fn include_endpoint(&mut self, _sample: &VoxelSample, _map: &dyn OccupancyModel) {}

    fn information_gain(&self) -> f64 {
        self.count as f64
    }
}

/// Number of rays whose occupied endpoint is directly preceded by an unknown voxel.
#[derive(Clone, Debug, Default)]
pub struct RearSideVoxelIg {
    count: u64,
    previous_unknown: bool,
}

impl RearSideVoxelIg {
    /// Registered name.
    pub const NAME: &'static str = "rear_side_voxel_ig";

    /// Create the metric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IgMetric for RearSideVoxelIg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn begin_ray(&mut self) {
        self.previous_unknown = false;
    }

    fn include_ray_sample(&mut self, sample: &VoxelSample, _map: &dyn OccupancyModel) {
        self.previous_unknown = sample.is_unknown();
    }

    fn include_endpoint(&mut self, _sample: &VoxelSample, _map: &dyn OccupancyModel) {
        if self.previous_unknown {
            self.count += 1;
        }
    }

    fn information_gain(&self) -> f64 {
        self.count as f64
    }
}

/// Number of unknown voxels passed by the rays that touch an occupied voxel.
///
/// Favors views that look at the unexplored surroundings of known surfaces.
#[derive(Clone, Debug, Default)]
pub struct ProximityCountIg {
    count: u64,
}

impl ProximityCountIg {
    /// Registered name.
    pub const NAME: &'static str = "proximity_count_ig";

    /// Create the metric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IgMetric for ProximityCountIg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn include_ray_sample(&mut self, sample: &VoxelSample, map: &dyn OccupancyModel) {
        if sample.is_unknown()
            && sample
                .coord
                .face_neighbors()
                .iter()
                .any(|&n| map.is_occupied(n))
        {
            self.count += 1;
        }
    }

    fn include_endpoint(&mut self, _sample: &VoxelSample, _map: &dyn OccupancyModel) {}

    fn information_gain(&self) -> f64 {
        self.count as f64
    }
}
