//! Information gain query parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::core::Pose;
use crate::error::IgError;

/// Rectangular region of the image, in fractions of width/height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubWindow {
    /// Left edge [0, 1]
    pub min_x_perc: f64,
    /// Right edge [0, 1]
    pub max_x_perc: f64,
    /// Top edge [0, 1]
    pub min_y_perc: f64,
    /// Bottom edge [0, 1]
    pub max_y_perc: f64,
}

impl Default for SubWindow {
    fn default() -> Self {
        Self {
            min_x_perc: 0.0,
            max_x_perc: 1.0,
            min_y_perc: 0.0,
            max_y_perc: 1.0,
        }
    }
}

impl SubWindow {
    fn validate(&self) -> Result<(), IgError> {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        if ![
            self.min_x_perc,
            self.max_x_perc,
            self.min_y_perc,
            self.max_y_perc,
        ]
        .into_iter()
        .all(unit)
        {
            return Err(IgError::ConfigurationInvalid(format!(
                "ray window must lie in [0, 1]: {:?}",
                self
            )));
        }
        if self.min_x_perc > self.max_x_perc {
            return Err(IgError::ConfigurationInvalid(format!(
                "ray window x range inverted: min {} > max {}",
                self.min_x_perc, self.max_x_perc
            )));
        }
        if self.min_y_perc > self.max_y_perc {
            return Err(IgError::ConfigurationInvalid(format!(
                "ray window y range inverted: min {} > max {}",
                self.min_y_perc, self.max_y_perc
            )));
        }
        Ok(())
    }
}

/// Parameters of one information gain query.
///
/// `Default` gives the documented defaults: 1 ray per pixel on both axes,
/// step size 1, the full image, depths `[0, 10]` and a pass-through
/// threshold of 0. `path` and `metric_names` must be filled in by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgRetrievalCommand {
    /// Poses to evaluate. Only the first one is used.
    pub path: Vec<Pose>,
    /// Metrics to compute; results are returned in the same order
    pub metric_names: Vec<String>,
    /// Rays per pixel along the image x-axis
    pub ray_resolution_x: f64,
    /// Rays per pixel along the image y-axis
    pub ray_resolution_y: f64,
    /// Include every n-th voxel along a ray (0 is treated as 1)
    pub ray_step_size: u32,
    /// Image region through which rays are cast
    pub ray_window: SubWindow,
    /// Depth at which sampling starts (map units)
    pub min_ray_depth: f64,
    /// Depth at which rays stop (map units)
    pub max_ray_depth: f64,
    /// Occupied voxels at or below this likelihood do not stop a ray
    pub occupied_passthrough_threshold: f64,
}

impl Default for IgRetrievalCommand {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            metric_names: Vec::new(),
            ray_resolution_x: 1.0,
            ray_resolution_y: 1.0,
            ray_step_size: 1,
            ray_window: SubWindow::default(),
            min_ray_depth: 0.0,
            max_ray_depth: 10.0,
            occupied_passthrough_threshold: 0.0,
        }
    }
}

/// A command whose parameters have been checked and normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedCommand {
    /// Pose rays are cast from (`path[0]`)
    pub pose: Pose,
    /// Requested metric names, in request order
    pub metric_names: Vec<String>,
    /// Rays per pixel, x
    pub ray_resolution_x: f64,
    /// Rays per pixel, y
    pub ray_resolution_y: f64,
    /// Step size, at least 1
    pub ray_step_size: u32,
    /// Checked window
    pub ray_window: SubWindow,
    /// Minimum depth
    pub min_ray_depth: f64,
    /// Maximum depth
    pub max_ray_depth: f64,
    /// Pass-through threshold
    pub occupied_passthrough_threshold: f64,
}

impl IgRetrievalCommand {
    /// Command for a single pose and a list of metrics, other fields default.
    pub fn for_pose<I, S>(pose: Pose, metric_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: vec![pose],
            metric_names: metric_names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check every parameter range and normalize `ray_step_size`.
    pub fn validate(&self) -> Result<ValidatedCommand, IgError> {
        let pose = *self
            .path
            .first()
            .ok_or_else(|| IgError::ConfigurationInvalid("path must contain a pose".into()))?;

        if self.metric_names.is_empty() {
            return Err(IgError::ConfigurationInvalid(
                "at least one metric name is required".into(),
            ));
        }

        for (axis, res) in [("x", self.ray_resolution_x), ("y", self.ray_resolution_y)] {
            if !(res.is_finite() && res > 0.0) {
                return Err(IgError::ConfigurationInvalid(format!(
                    "ray resolution {} must be positive, got {}",
                    axis, res
                )));
            }
        }

        self.ray_window.validate()?;

        if !(self.min_ray_depth.is_finite() && self.max_ray_depth.is_finite()) {
            return Err(IgError::ConfigurationInvalid(
                "ray depths must be finite".into(),
            ));
        }
        if self.min_ray_depth < 0.0 || self.min_ray_depth > self.max_ray_depth {
            return Err(IgError::ConfigurationInvalid(format!(
                "ray depths must satisfy 0 <= min <= max, got [{}, {}]",
                self.min_ray_depth, self.max_ray_depth
            )));
        }

        if !(0.0..=1.0).contains(&self.occupied_passthrough_threshold) {
            return Err(IgError::ConfigurationInvalid(format!(
                "occupied pass-through threshold must be in [0, 1], got {}",
                self.occupied_passthrough_threshold
            )));
        }

        Ok(ValidatedCommand {
            pose,
            metric_names: self.metric_names.clone(),
            ray_resolution_x: self.ray_resolution_x,
            ray_resolution_y: self.ray_resolution_y,
            ray_step_size: self.ray_step_size.max(1),
            ray_window: self.ray_window,
            min_ray_depth: self.min_ray_depth,
            max_ray_depth: self.max_ray_depth,
            occupied_passthrough_threshold: self.occupied_passthrough_threshold,
        })
    }
}
