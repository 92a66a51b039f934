//! Amanatides & Woo voxel traversal.
//!
//! Walks every voxel pierced by a ray, in order, computing at each step the
//! distance to the next voxel boundary along each axis:
//!
//! ```text
//!   origin ●──┼────┼──┼───┼────▶
//!          t=0  t1   t2 t3  ...   (t = distance where the ray enters a voxel)
//! ```
//!
//! Directions are normalized on construction so `t` is a metric depth.

use nalgebra::{Point3, Vector3};

use crate::core::VoxelCoord;

/// Iterator over `(voxel, entry_depth)` pairs along a ray.
///
/// The first item is the voxel containing the ray origin at depth 0.
/// The iterator is unbounded; callers stop on depth or bounds.
#[derive(Clone, Debug)]
pub struct VoxelTraversal {
    current: VoxelCoord,
    step: [i32; 3],
    t_max: [f64; 3],
    t_delta: [f64; 3],
    first: bool,
    degenerate: bool,
}

impl VoxelTraversal {
    /// Create a traversal for a grid with the given origin and voxel size.
    ///
    /// A zero direction yields only the origin voxel.
    pub fn new(
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        grid_origin: &Point3<f64>,
        resolution: f64,
    ) -> Self {
        let resolution = resolution.abs().max(f64::EPSILON);
        let current = VoxelCoord::from_world(origin, grid_origin, resolution);

        let norm = direction.norm();
        let degenerate = norm < f64::EPSILON;
        let dir = if degenerate {
            Vector3::zeros()
        } else {
            direction / norm
        };

        let rel = origin - grid_origin;
        let pos = [rel.x, rel.y, rel.z];
        let d = [dir.x, dir.y, dir.z];
        let c = [current.x, current.y, current.z];

        let mut step = [0i32; 3];
        let mut t_max = [f64::INFINITY; 3];
        let mut t_delta = [f64::INFINITY; 3];

        for i in 0..3 {
            if d[i].abs() > f64::EPSILON {
                step[i] = if d[i] > 0.0 { 1 } else { -1 };
                t_delta[i] = (resolution / d[i]).abs();
                let boundary = if d[i] > 0.0 {
                    (f64::from(c[i]) + 1.0) * resolution
                } else {
                    f64::from(c[i]) * resolution
                };
                t_max[i] = (boundary - pos[i]) / d[i];
            }
        }

        Self {
            current,
            step,
            t_max,
            t_delta,
            first: true,
            degenerate,
        }
    }
}

impl Iterator for VoxelTraversal {
    type Item = (VoxelCoord, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.first {
            self.first = false;
            return Some((self.current, 0.0));
        }
        if self.degenerate {
            return None;
        }

        let axis = if self.t_max[0] < self.t_max[1] {
            if self.t_max[0] < self.t_max[2] { 0 } else { 2 }
        } else if self.t_max[1] < self.t_max[2] {
            1
        } else {
            2
        };

        let t = self.t_max[axis];
        match axis {
            0 => self.current.x += self.step[0],
            1 => self.current.y += self.step[1],
            _ => self.current.z += self.step[2],
        }
        self.t_max[axis] += self.t_delta[axis];

        Some((self.current, t))
    }
}
