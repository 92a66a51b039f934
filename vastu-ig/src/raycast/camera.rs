//! Pinhole camera model and ray generation over an image sub-window.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::command::SubWindow;
use crate::core::Pose;

/// Pinhole intrinsics of the simulated/real depth sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraModel {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Focal length along x (pixels)
    pub fx: f64,
    /// Focal length along y (pixels)
    pub fy: f64,
    /// Principal point x (pixels)
    pub cx: f64,
    /// Principal point y (pixels)
    pub cy: f64,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fx: 525.0,
            fy: 525.0,
            cx: 320.0,
            cy: 240.0,
        }
    }
}

/// One ray in world coordinates. `direction` is unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin (sensor position)
    pub origin: Point3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
}

impl CameraModel {
    /// Create a camera with the principal point at the image center.
    pub fn centered(width: u32, height: u32, fx: f64, fy: f64) -> Self {
        Self {
            width,
            height,
            fx,
            fy,
            cx: f64::from(width) / 2.0,
            cy: f64::from(height) / 2.0,
        }
    }

    /// Check that the intrinsics describe a usable camera.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.fx.is_finite()
            && self.fy.is_finite()
            && self.fx > 0.0
            && self.fy > 0.0
            && self.cx.is_finite()
            && self.cy.is_finite()
    }

    /// Unit direction in the optical frame through pixel `(u, v)`.
    #[inline]
    pub fn pixel_direction(&self, u: f64, v: f64) -> Vector3<f64> {
        Vector3::new((u - self.cx) / self.fx, (v - self.cy) / self.fy, 1.0).normalize()
    }

    /// Number of samples along one axis of the window.
    ///
    /// `None` if the count does not fit a `usize`.
    fn axis_count(extent: u32, min_perc: f64, max_perc: f64, rays_per_pixel: f64) -> Option<usize> {
        let span = (max_perc - min_perc) * f64::from(extent);
        let count = (span * rays_per_pixel).ceil();
        if !count.is_finite() || count >= usize::MAX as f64 {
            return None;
        }
        Some((count.max(0.0) as usize).max(1))
    }

    /// Pixel sample positions along one axis of the window.
    ///
    /// Samples sit at cell centres of a `1 / rays_per_pixel` pitch; a window of
    /// zero width still gets one sample.
    fn axis_samples(
        extent: u32,
        min_perc: f64,
        max_perc: f64,
        rays_per_pixel: f64,
        count: usize,
    ) -> Vec<f64> {
        let start = min_perc * f64::from(extent);
        let end = max_perc * f64::from(extent);
        let pitch = 1.0 / rays_per_pixel;
        (0..count)
            .map(|i| (start + (i as f64 + 0.5) * pitch).min(end.max(start)))
            .collect()
    }

    /// Number of rays [`Self::rays`] would produce for a window and resolution.
    ///
    /// `None` if the count overflows a `usize`.
    pub fn ray_count(&self, window: &SubWindow, res_x: f64, res_y: f64) -> Option<usize> {
        let nx = Self::axis_count(self.width, window.min_x_perc, window.max_x_perc, res_x)?;
        let ny = Self::axis_count(self.height, window.min_y_perc, window.max_y_perc, res_y)?;
        nx.checked_mul(ny)
    }

    /// World-frame rays through the sub-window, row-major.
    ///
    /// Window and resolution are expected to be validated already, and the
    /// caller is responsible for bounding [`Self::ray_count`]. An overflowing
    /// count yields no rays.
    pub fn rays(&self, pose: &Pose, window: &SubWindow, res_x: f64, res_y: f64) -> Vec<Ray> {
        let (Some(nx), Some(ny)) = (
            Self::axis_count(self.width, window.min_x_perc, window.max_x_perc, res_x),
            Self::axis_count(self.height, window.min_y_perc, window.max_y_perc, res_y),
        ) else {
            return Vec::new();
        };
        let Some(total) = nx.checked_mul(ny) else {
            return Vec::new();
        };
        let us = Self::axis_samples(self.width, window.min_x_perc, window.max_x_perc, res_x, nx);
        let vs = Self::axis_samples(self.height, window.min_y_perc, window.max_y_perc, res_y, ny);
        let origin = Point3::from(pose.translation.vector);

        let mut rays = Vec::with_capacity(total);
        for &v in &vs {
            for &u in &us {
                let direction = pose.rotation * self.pixel_direction(u, v);
                rays.push(Ray { origin, direction });
            }
        }
        rays
    }
}
