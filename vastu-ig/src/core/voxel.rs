//! Integer voxel coordinates and axis-aligned voxel bounds.

use std::ops::{Add, Sub};

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Integer index of a voxel in a regular grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    /// X index
    pub x: i32,
    /// Y index
    pub y: i32,
    /// Z index
    pub z: i32,
}

impl VoxelCoord {
    /// Create a new voxel coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Voxel containing a world point, for a grid with the given origin and voxel size.
    #[inline]
    pub fn from_world(point: &Point3<f64>, origin: &Point3<f64>, resolution: f64) -> Self {
        let rel = point - origin;
        Self::new(
            (rel.x / resolution).floor() as i32,
            (rel.y / resolution).floor() as i32,
            (rel.z / resolution).floor() as i32,
        )
    }

    /// World position of the voxel center.
    #[inline]
    pub fn center(&self, origin: &Point3<f64>, resolution: f64) -> Point3<f64> {
        Point3::new(
            origin.x + (f64::from(self.x) + 0.5) * resolution,
            origin.y + (f64::from(self.y) + 0.5) * resolution,
            origin.z + (f64::from(self.z) + 0.5) * resolution,
        )
    }

    /// The six face-adjacent neighbours.
    pub fn face_neighbors(&self) -> [VoxelCoord; 6] {
        [
            VoxelCoord::new(self.x + 1, self.y, self.z),
            VoxelCoord::new(self.x - 1, self.y, self.z),
            VoxelCoord::new(self.x, self.y + 1, self.z),
            VoxelCoord::new(self.x, self.y - 1, self.z),
            VoxelCoord::new(self.x, self.y, self.z + 1),
            VoxelCoord::new(self.x, self.y, self.z - 1),
        ]
    }
}

impl Add for VoxelCoord {
    type Output = VoxelCoord;

    fn add(self, rhs: Self) -> Self::Output {
        VoxelCoord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for VoxelCoord {
    type Output = VoxelCoord;

    fn sub(self, rhs: Self) -> Self::Output {
        VoxelCoord::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Inclusive axis-aligned box of voxel coordinates (the mapped volume).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelBounds {
    /// Minimum corner (inclusive)
    pub min: VoxelCoord,
    /// Maximum corner (inclusive)
    pub max: VoxelCoord,
}

impl VoxelBounds {
    /// Create bounds from two corners, ordering each axis.
    pub fn new(a: VoxelCoord, b: VoxelCoord) -> Self {
        Self {
            min: VoxelCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: VoxelCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Check whether a coordinate lies inside the bounds.
    #[inline]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
            && coord.z >= self.min.z
            && coord.z <= self.max.z
    }

    /// Number of voxels along each axis.
    pub fn extent(&self) -> (usize, usize, usize) {
        (
            (self.max.x - self.min.x + 1) as usize,
            (self.max.y - self.min.y + 1) as usize,
            (self.max.z - self.min.z + 1) as usize,
        )
    }

    /// Total number of voxels in the box.
    pub fn volume(&self) -> usize {
        let (w, h, d) = self.extent();
        w * h * d
    }

    /// Iterate over every coordinate in the box (x fastest).
    pub fn iter(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        (self.min.z..=self.max.z).flat_map(move |z| {
            (self.min.y..=self.max.y)
                .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| VoxelCoord::new(x, y, z)))
        })
    }
}
