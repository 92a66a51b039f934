//! Simulated depth sensor.

use std::sync::Arc;

use parking_lot::RwLock;
use vastu_ig::{
    CameraModel, MapError, OccupancyModel, Pose, SubWindow, VoxelMap, VoxelTraversal,
};

/// Probability written for voxels a simulated ray passed through.
const OBSERVED_FREE: f64 = 0.1;

/// Copies ground-truth occupancy into a belief map along camera rays.
///
/// This is a stand-in for a real measurement pipeline, not sensor fusion:
/// observed voxels take the ground-truth value (or [`OBSERVED_FREE`] where
/// the ground truth is empty) and rays stop at the first occupied voxel.
pub struct SimulatedSensor {
    ground_truth: Arc<VoxelMap>,
    belief: Arc<RwLock<VoxelMap>>,
    camera: CameraModel,
    max_range: f64,
    ray_resolution: f64,
}

impl SimulatedSensor {
    pub fn new(
        ground_truth: Arc<VoxelMap>,
        belief: Arc<RwLock<VoxelMap>>,
        camera: CameraModel,
        max_range: f64,
        ray_resolution: f64,
    ) -> Self {
        Self {
            ground_truth,
            belief,
            camera,
            max_range,
            ray_resolution,
        }
    }

    /// Shared belief map written by [`Self::observe`].
    pub fn belief(&self) -> Arc<RwLock<VoxelMap>> {
        Arc::clone(&self.belief)
    }

    /// Measure from `pose`; returns the number of newly known voxels.
    pub fn observe(&self, pose: &Pose) -> Result<usize, MapError> {
        let truth = &*self.ground_truth;
        let rays = self.camera.rays(
            pose,
            &SubWindow::default(),
            self.ray_resolution,
            self.ray_resolution,
        );

        let mut belief = self.belief.write();
        let before = belief.known_count();
        for ray in &rays {
            let traversal = VoxelTraversal::new(
                &ray.origin,
                &ray.direction,
                &truth.origin(),
                truth.resolution(),
            );
            for (coord, depth) in traversal {
                if depth > self.max_range || !truth.bounds().contains(coord) {
                    break;
                }
                match truth.occupancy(coord) {
                    Some(p) if p > truth.occupied_threshold() => {
                        belief.set_occupancy(coord, p)?;
                        break;
                    }
                    Some(p) => belief.set_occupancy(coord, p)?,
                    None => belief.set_occupancy(coord, OBSERVED_FREE)?,
                }
            }
        }
        Ok(belief.known_count() - before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Isometry3;
    use vastu_ig::{VoxelBounds, VoxelCoord};

    fn column() -> VoxelMap {
        VoxelMap::new(
            1.0,
            VoxelBounds::new(VoxelCoord::new(-2, -2, 0), VoxelCoord::new(2, 2, 20)),
        )
        .unwrap()
    }

    #[test]
    fn test_observation_stops_at_surface() {
        let mut truth = column();
        truth.set_occupancy(VoxelCoord::new(0, 0, 4), 0.95).unwrap();
        let belief = Arc::new(RwLock::new(column()));
        let sensor = SimulatedSensor::new(
            Arc::new(truth),
            Arc::clone(&belief),
            CameraModel::centered(1, 1, 1.0, 1.0),
            10.0,
            1.0,
        );

        let revealed = sensor
            .observe(&Isometry3::translation(0.5, 0.5, 0.5))
            .unwrap();
        assert_eq!(revealed, 5);

        let belief = belief.read();
        assert_eq!(belief.occupancy(VoxelCoord::new(0, 0, 0)), Some(OBSERVED_FREE));
        assert_eq!(belief.occupancy(VoxelCoord::new(0, 0, 4)), Some(0.95));
        assert_eq!(belief.occupancy(VoxelCoord::new(0, 0, 5)), None);
    }

    #[test]
    fn test_repeat_observation_reveals_nothing_new() {
        let belief = Arc::new(RwLock::new(column()));
        let sensor = SimulatedSensor::new(
            Arc::new(column()),
            belief,
            CameraModel::centered(1, 1, 1.0, 1.0),
            3.0,
            1.0,
        );
        let pose = Isometry3::translation(0.5, 0.5, 0.5);
        assert_eq!(sensor.observe(&pose).unwrap(), 4);
        assert_eq!(sensor.observe(&pose).unwrap(), 0);
    }
}
