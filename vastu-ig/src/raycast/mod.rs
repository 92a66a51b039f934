//! Ray generation and voxel traversal.
//!
//! - [`CameraModel`]: pinhole intrinsics, turns a pose plus image sub-window
//!   into world-frame [`Ray`]s at a given angular resolution
//! - [`VoxelTraversal`]: DDA walk through every voxel pierced by a ray

mod camera;
mod traversal;

pub use camera::{CameraModel, Ray};
pub use traversal::VoxelTraversal;
