//! Ray casting behavior of the information gain estimator.

mod common;

use approx::assert_relative_eq;
use common::*;
use nalgebra::Isometry3;
use vastu_ig::{
    CameraModel, CancelToken, EstimatorConfig, IgError, IgRetrievalCommand, IgRetrievalResult,
    IgRetrievalStatus, InformationGainEstimator, SubWindow, VoxelCoord,
};

#[test]
fn test_unknown_column_counts_every_voxel_up_to_max_depth() {
    // Voxels are entered at depths 0, 0.5, 1.5, ..., 9.5; 10.5 exceeds max depth
    let gain = first_gain(
        &single_ray_estimator(),
        &column_map(),
        &column_command(&["unobserved_voxel_ig"]),
    );
    assert_eq!(gain, 11.0);
}

#[test]
fn test_step_size_zero_matches_one() {
    let estimator = single_ray_estimator();
    let mut map = column_map();
    map.set_occupancy(VoxelCoord::new(0, 0, 6), 0.2).unwrap();
    map.set_occupancy(VoxelCoord::new(0, 0, 8), 0.95).unwrap();

    let metrics = [
        "occlusion_aware_total_ig",
        "unobserved_voxel_ig",
        "rear_side_voxel_ig",
        "average_entropy_ig",
    ];
    let mut zero = column_command(&metrics);
    zero.ray_step_size = 0;
    let mut one = column_command(&metrics);
    one.ray_step_size = 1;

    let cancel = CancelToken::new();
    let a = estimator.estimate(&map, &zero, &cancel).unwrap();
    let b = estimator.estimate(&map, &one, &cancel).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_step_size_skips_voxels() {
    let mut command = column_command(&["unobserved_voxel_ig"]);
    command.ray_step_size = 2;
    let gain = first_gain(&single_ray_estimator(), &column_map(), &command);
    // z = 0, 2, 4, 6, 8, 10
    assert_eq!(gain, 6.0);
}

#[test]
fn test_min_depth_skips_near_voxels() {
    let mut command = column_command(&["unobserved_voxel_ig"]);
    command.min_ray_depth = 2.0;
    let gain = first_gain(&single_ray_estimator(), &column_map(), &command);
    // z = 3 (entered at 2.5) through z = 10 (entered at 9.5)
    assert_eq!(gain, 8.0);
}

#[test]
fn test_free_voxel_below_threshold_continues_ray() {
    let mut map = column_map();
    map.set_occupancy(VoxelCoord::new(0, 0, 3), 0.3).unwrap();
    let mut command = column_command(&["unobserved_voxel_ig", "rear_side_voxel_ig"]);
    command.occupied_passthrough_threshold = 0.5;

    let response = single_ray_estimator()
        .estimate(&map, &command, &CancelToken::new())
        .unwrap();
    assert_eq!(response.results[0].predicted_gain(), Some(10.0));
    assert_eq!(response.results[1].predicted_gain(), Some(0.0));
}

#[test]
fn test_confident_occupied_voxel_halts_ray() {
    let mut map = column_map();
    map.set_occupancy(VoxelCoord::new(0, 0, 3), 0.9).unwrap();
    let mut command = column_command(&["unobserved_voxel_ig", "rear_side_voxel_ig"]);
    command.occupied_passthrough_threshold = 0.5;

    let response = single_ray_estimator()
        .estimate(&map, &command, &CancelToken::new())
        .unwrap();
    // Only z = 0, 1, 2 are seen before the hit; nothing behind it counts
    assert_eq!(response.results[0].predicted_gain(), Some(3.0));
    // Terminal contribution: the voxel in front of the surface is unknown
    assert_eq!(response.results[1].predicted_gain(), Some(1.0));
}

#[test]
fn test_passthrough_threshold_lets_weak_occupied_voxel_through() {
    let mut map = column_map();
    map.set_occupancy(VoxelCoord::new(0, 0, 3), 0.9).unwrap();
    let mut command = column_command(&["unobserved_voxel_ig"]);
    command.occupied_passthrough_threshold = 0.95;

    let gain = first_gain(&single_ray_estimator(), &map, &command);
    assert_eq!(gain, 10.0);
}

#[test]
fn test_terminal_entropy_contribution() {
    let mut map = column_map();
    map.set_occupancy(VoxelCoord::new(0, 0, 1), 0.9).unwrap();
    let command = column_command(&["occlusion_aware_total_ig"]);

    let gain = first_gain(&single_ray_estimator(), &map, &command);
    // Unknown voxel at full visibility, then the hit at visibility 0.5
    let expected = vastu_ig::metrics::entropy(0.5) + 0.5 * vastu_ig::metrics::entropy(0.9);
    assert_relative_eq!(gain, expected, epsilon = 1e-9);
}

#[test]
fn test_unknown_metric_isolated_from_valid_ones() {
    let command = column_command(&["unobserved_voxel_ig", "no_such_metric", "rear_side_voxel_ig"]);
    let response = single_ray_estimator()
        .estimate(&column_map(), &command, &CancelToken::new())
        .unwrap();

    assert_eq!(response.status, IgRetrievalStatus::UnknownMetric);
    assert_eq!(response.results.len(), 3);
    assert_eq!(
        response.results[0],
        IgRetrievalResult::Succeeded {
            predicted_gain: 11.0
        }
    );
    assert_eq!(response.results[1], IgRetrievalResult::UnknownMetric);
    assert_eq!(response.results[2].status(), IgRetrievalStatus::Succeeded);
}

#[test]
fn test_inverted_window_rejected_before_casting() {
    let mut command = column_command(&["unobserved_voxel_ig"]);
    command.ray_window = SubWindow {
        min_x_perc: 0.9,
        max_x_perc: 0.1,
        ..SubWindow::default()
    };
    let result = single_ray_estimator().estimate_with_stats(
        &column_map(),
        &command,
        &CancelToken::new(),
    );
    assert!(matches!(result, Err(IgError::ConfigurationInvalid(_))));
}

#[test]
fn test_huge_ray_resolution_rejected() {
    let mut command = column_command(&["unobserved_voxel_ig"]);
    command.ray_resolution_x = 1e19;
    let result = small_camera_estimator(8).estimate(&column_map(), &command, &CancelToken::new());
    assert!(matches!(result, Err(IgError::ConfigurationInvalid(_))));
}

#[test]
fn test_ray_budget_limits_resolution() {
    let estimator = InformationGainEstimator::new(EstimatorConfig {
        camera: CameraModel::centered(16, 16, 8.0, 8.0),
        max_rays: 100,
        ..Default::default()
    })
    .unwrap();
    let map = column_map();

    // 16 x 16 rays
    let command = column_command(&["unobserved_voxel_ig"]);
    let result = estimator.estimate(&map, &command, &CancelToken::new());
    assert!(matches!(result, Err(IgError::ConfigurationInvalid(_))));

    // 8 x 8 rays
    let mut command = column_command(&["unobserved_voxel_ig"]);
    command.ray_resolution_x = 0.5;
    command.ray_resolution_y = 0.5;
    let (response, stats) = estimator
        .estimate_with_stats(&map, &command, &CancelToken::new())
        .unwrap();
    assert_eq!(response.status, IgRetrievalStatus::Succeeded);
    assert_eq!(stats.rays, 64);
}

#[test]
fn test_empty_metric_list_rejected() {
    let command = IgRetrievalCommand::for_pose(column_pose(), Vec::<String>::new());
    let result = single_ray_estimator().estimate(&column_map(), &command, &CancelToken::new());
    assert!(matches!(result, Err(IgError::ConfigurationInvalid(_))));
}

#[test]
fn test_pose_outside_map_fails_known_metrics() {
    let command = IgRetrievalCommand::for_pose(
        Isometry3::translation(100.0, 0.0, 0.0),
        ["unobserved_voxel_ig", "bogus"],
    );
    let response = single_ray_estimator()
        .estimate(&column_map(), &command, &CancelToken::new())
        .unwrap();
    assert_eq!(response.status, IgRetrievalStatus::Failed);
    assert_eq!(response.results[0], IgRetrievalResult::Failed);
    assert_eq!(response.results[1], IgRetrievalResult::UnknownMetric);
}

#[test]
fn test_cancellation_between_rays() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = small_camera_estimator(8).estimate(
        &column_map(),
        &column_command(&["unobserved_voxel_ig"]),
        &cancel,
    );
    assert_eq!(result, Err(IgError::Cancelled));
}

#[test]
fn test_sub_window_reduces_gain() {
    let estimator = small_camera_estimator(8);
    let map = column_map();
    let full = column_command(&["unobserved_voxel_ig"]);
    let mut quarter = full.clone();
    quarter.ray_window = SubWindow {
        min_x_perc: 0.0,
        max_x_perc: 0.5,
        min_y_perc: 0.0,
        max_y_perc: 0.5,
    };

    let full_gain = first_gain(&estimator, &map, &full);
    let quarter_gain = first_gain(&estimator, &map, &quarter);
    assert!(quarter_gain > 0.0);
    assert!(quarter_gain < full_gain);
}

#[test]
fn test_known_free_space_has_less_gain_than_unknown() {
    let estimator = small_camera_estimator(8);
    let unknown = column_map();
    let mut explored = column_map();
    for z in 0..=20 {
        for y in -2..=2 {
            for x in -2..=2 {
                explored
                    .set_occupancy(VoxelCoord::new(x, y, z), 0.1)
                    .unwrap();
            }
        }
    }
    let command = column_command(&["occlusion_aware_total_ig"]);
    assert!(first_gain(&estimator, &explored, &command) < first_gain(&estimator, &unknown, &command));
}
