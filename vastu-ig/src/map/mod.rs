//! Read-only access to a probabilistic volumetric map.
//!
//! The estimator never builds or fuses maps; it only samples occupancy
//! likelihoods through [`OccupancyModel`]. [`VoxelMap`] is a sparse in-memory
//! implementation used by the simulator, tests and benches.

mod voxel_map;

pub use voxel_map::VoxelMap;

use nalgebra::Point3;

use crate::core::{VoxelBounds, VoxelCoord};

/// Default probability above which a known voxel counts as occupied.
pub const DEFAULT_OCCUPIED_THRESHOLD: f64 = 0.5;

/// Read-only view of a volumetric occupancy model.
pub trait OccupancyModel: Send + Sync {
    /// Voxel edge length in world units (usually meters).
    fn resolution(&self) -> f64;

    /// World position of the corner of voxel (0, 0, 0).
    fn origin(&self) -> Point3<f64>;

    /// Inclusive voxel box of the mapped volume.
    fn bounds(&self) -> VoxelBounds;

    /// Occupancy likelihood of a voxel, `None` if it was never observed.
    fn occupancy(&self, coord: VoxelCoord) -> Option<f64>;

    /// Probability above which a known voxel is classified as occupied.
    fn occupied_threshold(&self) -> f64 {
        DEFAULT_OCCUPIED_THRESHOLD
    }

    /// Voxel containing a world point.
    fn voxel_of(&self, point: &Point3<f64>) -> VoxelCoord {
        VoxelCoord::from_world(point, &self.origin(), self.resolution())
    }

    /// Check whether a world point lies inside the mapped volume.
    fn contains_point(&self, point: &Point3<f64>) -> bool {
        self.bounds().contains(self.voxel_of(point))
    }

    /// Check whether a voxel is known and classified as occupied.
    fn is_occupied(&self, coord: VoxelCoord) -> bool {
        self.occupancy(coord)
            .is_some_and(|p| p > self.occupied_threshold())
    }
}
