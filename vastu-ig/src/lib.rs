//! # VastuIG
//!
//! Information gain estimation by ray casting against probabilistic voxel maps.
//!
//! ## Overview
//!
//! Given a candidate sensor pose and a list of metric names, the
//! [`InformationGainEstimator`] casts rays through an image sub-window of a
//! pinhole sensor and predicts, per metric, how much a measurement taken from
//! that pose would reduce map uncertainty.
//!
//! - **Map access** goes through the read-only [`OccupancyModel`] trait
//! - **Metrics** implement [`IgMetric`] and are resolved by name through a
//!   [`MetricRegistry`]
//! - **World-model boundary**: [`WorldModelChannel`], implemented in-process
//!   by [`LocalWorldModel`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use vastu_ig::{
//!     EstimatorConfig, IgRetrievalCommand, InformationGainEstimator, LocalWorldModel,
//!     VoxelBounds, VoxelCoord, VoxelMap, WorldModelChannel, pose_from_xyz_rpy,
//! };
//!
//! let bounds = VoxelBounds::new(VoxelCoord::new(-50, -50, 0), VoxelCoord::new(50, 50, 30));
//! let map = Arc::new(RwLock::new(VoxelMap::new(0.1, bounds)?));
//! let estimator = InformationGainEstimator::new(EstimatorConfig::default())?;
//! let world = LocalWorldModel::new(map, estimator);
//!
//! let pose = pose_from_xyz_rpy(0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
//! let command = IgRetrievalCommand::for_pose(pose, ["occlusion_aware_total_ig"]);
//! let response = world.view_information_gain(&command)?;
//! println!("{:?}", response.results[0].predicted_gain());
//! ```

#![warn(missing_docs)]

pub mod channel;
pub mod command;
pub mod config;
pub mod core;
pub mod error;
pub mod estimator;
pub mod map;
pub mod metrics;
pub mod raycast;
pub mod response;

pub use channel::{LocalWorldModel, WorldModelChannel};
pub use command::{IgRetrievalCommand, SubWindow, ValidatedCommand};
pub use config::EstimatorConfig;
pub use crate::core::{
    CancelToken, Pose, VoxelBounds, VoxelCoord, look_at, pose_from_xyz_rpy, rotation_distance,
    translation_distance,
};
pub use error::{IgError, MapError};
pub use estimator::{CastStats, InformationGainEstimator};
pub use map::{OccupancyModel, VoxelMap};
pub use metrics::{IgMetric, MetricParams, MetricRegistry, VoxelSample};
pub use raycast::{CameraModel, Ray, VoxelTraversal};
pub use response::{IgResponse, IgRetrievalResult, IgRetrievalStatus};
