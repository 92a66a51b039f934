//! Error types for VastuIG.

use std::time::Duration;

use crate::core::VoxelCoord;

/// Errors raised by an information gain query as a whole.
///
/// Per-metric problems (unknown names, non-finite results) are not errors;
/// they are reported through [`crate::IgRetrievalResult`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IgError {
    /// Malformed command parameters (inverted window, empty metric list, ...)
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// The query was aborted through its cancel token
    #[error("Information gain computation cancelled")]
    Cancelled,

    /// The world model could not be reached
    #[error("World model communication failed: {0}")]
    Communication(String),

    /// The world model did not answer within the allowed time
    #[error("World model call timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors raised while editing a voxel map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    /// Coordinate outside the mapped volume
    #[error("Voxel {coord:?} is outside the mapped volume")]
    OutOfBounds {
        /// The offending coordinate
        coord: VoxelCoord,
    },

    /// Occupancy probability outside [0, 1]
    #[error("Occupancy probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Voxel size must be positive and finite
    #[error("Voxel resolution must be positive, got {0}")]
    InvalidResolution(f64),
}
