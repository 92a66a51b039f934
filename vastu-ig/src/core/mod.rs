//! Core types shared by the map, ray caster and estimator.
//!
//! ### Coordinates
//! - [`VoxelCoord`]: Integer voxel indices
//! - [`VoxelBounds`]: Inclusive voxel box describing the mapped volume
//!
//! ### Poses
//! - [`Pose`]: World-from-sensor 6-DoF transform (`Isometry3<f64>`)
//!
//! ### Cancellation
//! - [`CancelToken`]: Cooperative abort flag shared across threads

mod cancel;
mod pose;
mod voxel;

pub use cancel::CancelToken;
pub use pose::{Pose, look_at, pose_from_xyz_rpy, rotation_distance, translation_distance};
pub use voxel::{VoxelBounds, VoxelCoord};
