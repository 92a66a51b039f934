//! Test utilities for VastuIG estimation tests.

#![allow(dead_code)]

use nalgebra::Isometry3;
use vastu_ig::{
    CameraModel, EstimatorConfig, IgRetrievalCommand, InformationGainEstimator, Pose, VoxelBounds,
    VoxelCoord, VoxelMap,
};

/// Estimator whose camera casts exactly one ray along the optical axis.
pub fn single_ray_estimator() -> InformationGainEstimator {
    InformationGainEstimator::new(EstimatorConfig {
        camera: CameraModel::centered(1, 1, 1.0, 1.0),
        ..Default::default()
    })
    .expect("valid estimator config")
}

/// Estimator with a small square camera (`size` × `size` pixels, 90° FOV).
pub fn small_camera_estimator(size: u32) -> InformationGainEstimator {
    let f = f64::from(size) / 2.0;
    InformationGainEstimator::new(EstimatorConfig {
        camera: CameraModel::centered(size, size, f, f),
        ..Default::default()
    })
    .expect("valid estimator config")
}

/// Unit-voxel column map: x, y in [-2, 2], z in [0, 20], all unknown.
pub fn column_map() -> VoxelMap {
    VoxelMap::new(
        1.0,
        VoxelBounds::new(VoxelCoord::new(-2, -2, 0), VoxelCoord::new(2, 2, 20)),
    )
    .expect("valid map")
}

/// Pose in the center of voxel (0, 0, 0) looking along +Z.
pub fn column_pose() -> Pose {
    Isometry3::translation(0.5, 0.5, 0.5)
}

/// Command for the column pose.
pub fn column_command(metrics: &[&str]) -> IgRetrievalCommand {
    IgRetrievalCommand::for_pose(column_pose(), metrics.iter().copied())
}

/// Gain of the first metric, panicking if it did not succeed.
pub fn first_gain(
    estimator: &InformationGainEstimator,
    map: &VoxelMap,
    command: &IgRetrievalCommand,
) -> f64 {
    let response = estimator
        .estimate(map, command, &vastu_ig::CancelToken::new())
        .expect("estimation succeeds");
    response.results[0]
        .predicted_gain()
        .expect("metric succeeded")
}
